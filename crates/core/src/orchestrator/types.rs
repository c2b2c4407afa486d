//! Types for batch orchestration.

use serde::Serialize;

use crate::ledger::{OperationError, OperationRef};

/// Terminal outcome of one acquisition operation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionOutcome {
    Fulfilled(OperationRef),
    Rejected(OperationError),
}

/// One rejected operation, addressed by its submission index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedOp {
    /// Zero-based position in the batch's submission order.
    pub index: u32,
    #[serde(serialize_with = "serialize_error")]
    pub error: OperationError,
}

fn serialize_error<S: serde::Serializer>(
    error: &OperationError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&error.to_string())
}

/// Aggregated result of one batch.
///
/// Created empty when a batch starts, populated as outcomes arrive in
/// submission order, frozen when all outcomes are in (or the batch is
/// abandoned). For a completed batch,
/// `fulfilled.len() + rejected.len() == requested`.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Quantity the batch was admitted for.
    pub requested: u32,
    /// References of fulfilled operations, in submission order.
    pub fulfilled: Vec<OperationRef>,
    /// Rejections, ascending by submission index.
    pub rejected: Vec<RejectedOp>,
    /// True when the caller abandoned the batch before all outcomes arrived.
    /// In-flight operations still ran to completion on the ledger; only
    /// reporting stopped.
    pub abandoned: bool,
}

impl BatchResult {
    pub fn new(requested: u32) -> Self {
        Self {
            requested,
            fulfilled: Vec::with_capacity(requested as usize),
            rejected: Vec::new(),
            abandoned: false,
        }
    }

    /// Outcomes recorded so far.
    pub fn resolved(&self) -> u32 {
        (self.fulfilled.len() + self.rejected.len()) as u32
    }

    /// Whether every admitted operation has a recorded outcome.
    pub fn is_complete(&self) -> bool {
        !self.abandoned && self.resolved() == self.requested
    }
}
