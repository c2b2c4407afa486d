//! Batch result classification.
//!
//! Maps an aggregated batch result to a user-facing status. Pure and
//! advisory: classification mutates nothing and triggers nothing.

use crate::ledger::OperationError;
use crate::orchestrator::BatchResult;

/// User-facing status of a settled batch.
///
/// Partial failure is a first-class success-shaped outcome here, not an
/// exception path; abandonment is distinct from failure because operations
/// may still have fulfilled after reporting stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintStatus {
    AllSucceeded {
        fulfilled: u32,
    },
    PartialSuccess {
        fulfilled: u32,
        rejected: u32,
    },
    AllFailed {
        /// The first rejection's error, as a representative sample.
        sample: OperationError,
    },
    Abandoned {
        resolved: u32,
        requested: u32,
    },
}

impl MintStatus {
    /// Stable string tag for API responses and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            MintStatus::AllSucceeded { .. } => "all_succeeded",
            MintStatus::PartialSuccess { .. } => "partial_success",
            MintStatus::AllFailed { .. } => "all_failed",
            MintStatus::Abandoned { .. } => "abandoned",
        }
    }

    /// Human-readable summary for display.
    pub fn message(&self) -> String {
        match self {
            MintStatus::AllSucceeded { fulfilled } => {
                format!("Successfully minted {fulfilled} assets")
            }
            MintStatus::PartialSuccess {
                fulfilled,
                rejected,
            } => format!(
                "Minted {fulfilled} of {} assets; {rejected} operations were rejected",
                fulfilled + rejected
            ),
            MintStatus::AllFailed { sample } => {
                format!("All mint operations failed: {sample}")
            }
            MintStatus::Abandoned {
                resolved,
                requested,
            } => format!("Batch abandoned after {resolved} of {requested} outcomes"),
        }
    }
}

/// Classify a settled batch result.
pub fn classify(result: &BatchResult) -> MintStatus {
    if result.abandoned {
        return MintStatus::Abandoned {
            resolved: result.resolved(),
            requested: result.requested,
        };
    }

    if let Some(first) = result.rejected.first() {
        if result.fulfilled.is_empty() {
            MintStatus::AllFailed {
                sample: first.error.clone(),
            }
        } else {
            MintStatus::PartialSuccess {
                fulfilled: result.fulfilled.len() as u32,
                rejected: result.rejected.len() as u32,
            }
        }
    } else {
        MintStatus::AllSucceeded {
            fulfilled: result.fulfilled.len() as u32,
        }
    }
}
