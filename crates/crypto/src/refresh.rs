//! Periodic key refresh from an external key-issuing service.
//!
//! Fetching is delegated to a [`KeySource`]; the transport behind it (HTTP,
//! file, secret manager) and its timeouts and retries are the source's concern.

use std::{sync::Arc, time::Duration};

use {
    async_trait::async_trait,
    tokio::{task::JoinHandle, time::MissedTickBehavior},
    tokio_util::sync::CancellationToken,
};

#[cfg(feature = "metrics")]
use xid_metrics::{crypto as crypto_metrics, histogram};

use crate::{error::Result, key::KeySet, service::CryptoService, traits::Cipher};

/// Default interval between key refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

/// Supplier of complete replacement key sets.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch(&self) -> Result<KeySet>;
}

/// Settings for [`spawn_key_refresh`].
#[derive(Debug, Clone)]
pub struct RefreshOptions {
    pub interval: Duration,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

/// Fetch one key set and rotate to it.
///
/// On any failure the service keeps its current snapshot.
pub async fn refresh_once<C: Cipher>(
    service: &CryptoService<C>,
    source: &dyn KeySource,
) -> Result<()> {
    #[cfg(feature = "metrics")]
    let start = std::time::Instant::now();

    let keys = source.fetch().await?;
    service.rotate_keys(&keys)?;

    #[cfg(feature = "metrics")]
    histogram!(crypto_metrics::KEY_REFRESH_DURATION_SECONDS).record(start.elapsed().as_secs_f64());

    Ok(())
}

/// Spawn a background task that refreshes keys every `options.interval`.
///
/// The first refresh runs immediately. Failures are logged and the loop keeps
/// going with the previous snapshot. The task ends when `cancel` fires.
pub fn spawn_key_refresh<C: Cipher + 'static>(
    service: Arc<CryptoService<C>>,
    source: Arc<dyn KeySource>,
    options: RefreshOptions,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        #[cfg(feature = "tracing")]
        tracing::info!(interval_secs = options.interval.as_secs(), "starting key refresh loop");

        let mut ticker = tokio::time::interval(options.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    #[cfg(feature = "tracing")]
                    tracing::info!("key refresh loop stopped");
                    break;
                },
                _ = ticker.tick() => {
                    if let Err(e) = refresh_once(&service, source.as_ref()).await {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(kind = %e.kind(), error = %e, "key refresh failed, keeping previous snapshot");
                        #[cfg(not(feature = "tracing"))]
                        let _ = e;
                    }
                },
            }
        }
    })
}
