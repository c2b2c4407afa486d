//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the batch orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum operations in flight at once (0 = unlimited).
    /// Sized to respect the signing/broadcast service's rate limits; the
    /// bound queues submissions without letting one operation block another.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Terminal timeout per operation, in seconds.
    /// There is deliberately no batch-wide deadline: a stuck batch is
    /// abandoned by the caller instead.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_secs: u64,
}

fn default_max_in_flight() -> usize {
    16
}

fn default_operation_timeout() -> u64 {
    90
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
            operation_timeout_secs: default_operation_timeout(),
        }
    }
}
