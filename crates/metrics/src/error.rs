use std::error::Error as StdError;

/// Failure to build or install the metrics recorder.
#[derive(Debug, thiserror::Error)]
#[error("failed to install metrics recorder: {source}")]
pub struct Error {
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

#[cfg(feature = "prometheus")]
impl From<metrics_exporter_prometheus::BuildError> for Error {
    fn from(source: metrics_exporter_prometheus::BuildError) -> Self {
        Self {
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
