use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default relay polling interval.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Tunables of the publish hook.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublishConfig {
    /// Delay between relay status queries.
    pub poll_interval_ms: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PublishConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
