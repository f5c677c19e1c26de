use std::path::{Path, PathBuf};

use {
    tracing::{debug, warn},
    xid_crypto::KeySet,
    zeroize::Zeroizing,
};

use crate::{
    env_subst::substitute_env,
    error::{ConfigError, Result},
    schema::XidConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["xid.toml", "xid.json"];

/// Load config from the given path (TOML or JSON, chosen by extension).
pub fn load_config(path: &Path) -> Result<XidConfig> {
    let raw = read(path)?;
    parse_config(&substitute_env(&raw), path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./xid.{toml,json}` (project-local)
/// 2. `<user config dir>/xid/xid.{toml,json}` (user-global)
///
/// Returns `XidConfig::default()` if no config file is found or it fails to
/// load.
pub fn discover_and_load() -> XidConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    XidConfig::default()
}

/// Returns the user-global config directory (`~/.config/xid/` on Linux).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "xid").map(|d| d.config_dir().to_path_buf())
}

/// Load a JSON key-set file, substituting `${ENV_VAR}` placeholders first.
pub fn load_key_set(path: &Path) -> Result<KeySet> {
    let raw = Zeroizing::new(read(path)?);
    parse_key_set(&raw, path)
}

/// Parse key-set JSON. `path` is only used in error messages.
pub fn parse_key_set(raw: &str, path: &Path) -> Result<KeySet> {
    let raw = Zeroizing::new(substitute_env(raw));
    serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_config(raw: &str, path: &Path) -> Result<XidConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => toml::from_str(raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        "json" => serde_json::from_str(raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}
