//! Explorer configuration.

use serde::{Deserialize, Serialize};

/// Tree explorer behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Maximum number of concurrent children fetches while restoring
    /// expanded nodes after a refresh.
    #[serde(default = "default_refresh_batch_size")]
    pub refresh_batch_size: usize,
    /// Name given to the bundle created when one asset is dropped onto another.
    #[serde(default = "default_new_bundle_name")]
    pub new_bundle_name: String,
    /// Capacity of the explorer event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            refresh_batch_size: default_refresh_batch_size(),
            new_bundle_name: default_new_bundle_name(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_refresh_batch_size() -> usize {
    5
}

fn default_new_bundle_name() -> String {
    "New Bundle".to_string()
}

fn default_event_buffer() -> usize {
    64
}
