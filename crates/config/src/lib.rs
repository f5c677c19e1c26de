//! Configuration loading and key-set files.
//!
//! Config files: `xid.toml` or `xid.json`, searched in `./` then the user
//! config directory (`~/.config/xid/` on Linux).
//!
//! Supports `${ENV_VAR}` substitution in config and key-set files, so key
//! material can be injected from the environment instead of stored on disk.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod source;

pub use {
    error::{ConfigError, Result},
    loader::{config_dir, discover_and_load, load_config, load_key_set, parse_key_set},
    schema::{KeysConfig, MetricsConfig, XidConfig},
    source::FileKeySource,
};
