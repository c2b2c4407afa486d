//! Batch acquisition orchestrator.
//!
//! Fans an admitted request out into independent acquisition operations,
//! bounded by a submission pool, and aggregates the per-unit outcomes:
//! - **Submission**: concurrent, up to `max_in_flight` operations at once
//! - **Isolation**: a rejected operation never cancels or blocks a sibling
//! - **Aggregation**: outcomes recorded in submission order for reproducibility

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::BatchOrchestrator;
pub use types::{AcquisitionOutcome, BatchResult, RejectedOp};
