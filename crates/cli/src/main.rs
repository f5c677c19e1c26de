mod check_commands;
mod key_commands;
mod token_commands;

use std::path::PathBuf;

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    tracing::{debug, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
    xid_config::XidConfig,
    xid_metrics::{MetricsHandle, MetricsRecorderConfig, init_metrics},
};

#[derive(Parser)]
#[command(name = "xid", about = "xid: rotating-key tokens for opaque ids", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery of ./xid.toml and ~/.config/xid/).
    #[arg(long, global = true, env = "XID_CONFIG")]
    config: Option<PathBuf>,

    /// Key-set JSON file (overrides `keys.path` from the config).
    #[arg(long, global = true, env = "XID_KEYS")]
    keys: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random 256-bit key.
    Keygen {
        /// Print a complete key-set document using this id for the new key.
        #[arg(long)]
        id: Option<u8>,
    },
    /// Seal a plaintext id into a token under the current encryption key.
    Seal { plaintext: String },
    /// Open a token and print the plaintext id.
    Open {
        token: String,
        /// Print the plaintext as hex instead of text.
        #[arg(long, default_value_t = false)]
        hex: bool,
    },
    /// Show the structure of a token without decrypting it.
    Inspect { token: String },
    /// Validate the key-set file and report what it would publish.
    Check,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<XidConfig> {
    match cli.config {
        Some(ref path) => xid_config::load_config(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(xid_config::discover_and_load()),
    }
}

fn init_metrics_from(config: &XidConfig) -> anyhow::Result<MetricsHandle> {
    let handle = init_metrics(MetricsRecorderConfig {
        enabled: config.metrics.enabled,
        global_labels: config
            .metrics
            .labels
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    })?;
    Ok(handle)
}

/// Key-set path from `--keys`, falling back to `keys.path` in the config.
fn keys_path(cli_keys: Option<PathBuf>, config: &XidConfig) -> anyhow::Result<PathBuf> {
    cli_keys
        .or_else(|| config.keys.path.clone())
        .context("no key-set file: pass --keys, set XID_KEYS, or set keys.path in the config")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    debug!(version = env!("CARGO_PKG_VERSION"), "xid starting");

    let config = load_config(&cli)?;
    let metrics = init_metrics_from(&config)?;

    let result = match cli.command {
        Commands::Keygen { id } => key_commands::keygen(id),
        Commands::Inspect { ref token } => token_commands::inspect(token),
        Commands::Seal { ref plaintext } => {
            let path = keys_path(cli.keys, &config)?;
            token_commands::seal(&path, plaintext).await
        },
        Commands::Open { ref token, hex } => {
            let path = keys_path(cli.keys, &config)?;
            token_commands::open(&path, token, hex).await
        },
        Commands::Check => {
            let path = keys_path(cli.keys, &config)?;
            check_commands::check(&path)
        },
    };

    let rendered = metrics.render();
    if !rendered.is_empty() {
        info!(metrics = %rendered, "metrics snapshot");
    }

    result
}
