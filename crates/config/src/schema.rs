//! Config schema types.

use std::{collections::BTreeMap, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Default seconds between key refreshes.
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3600;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XidConfig {
    pub keys: KeysConfig,
    pub metrics: MetricsConfig,
}

/// Where key sets come from and how often they are reloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// JSON key-set file in the key service's response format.
    pub path: Option<PathBuf>,
    pub refresh_interval_secs: u64,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            path: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl KeysConfig {
    /// Refresh interval, never shorter than one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Labels attached to every exported metric.
    pub labels: BTreeMap<String, String>,
}
