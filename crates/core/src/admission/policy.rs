//! Admission checks for batch acquisition requests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::CallerFunds;

/// Errors rejecting a request before submission.
///
/// All of these surface before any network call and are never retried
/// automatically; the caller adjusts and asks again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// No caller identity is connected.
    #[error("no caller connected")]
    NoCaller,

    /// Issuance state has never been loaded.
    #[error("issuance machine not ready")]
    MachineNotReady,

    /// Requested quantity outside the per-batch bounds.
    #[error("quantity {quantity} outside allowed range {min}..={max}")]
    QuantityOutOfRange { quantity: u32, min: u32, max: u32 },

    /// Caller cannot cover the batch at the current unit price.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },
}

impl AdmissionError {
    /// Stable string tag for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            AdmissionError::NoCaller => "no_caller",
            AdmissionError::MachineNotReady => "machine_not_ready",
            AdmissionError::QuantityOutOfRange { .. } => "quantity_out_of_range",
            AdmissionError::InsufficientFunds { .. } => "insufficient_funds",
        }
    }
}

/// Proof that a request passed admission; consumed by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmittedRequest {
    pub quantity: u32,
    /// Unit price at admission time.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub total_cost: Decimal,
}

/// Per-batch quantity bounds.
///
/// Validation only: a quantity stepped outside the bounds by a UI control is
/// clamped there, never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionPolicy {
    /// Smallest admissible batch.
    #[serde(default = "default_min_quantity")]
    pub min_quantity: u32,
    /// Largest admissible batch.
    #[serde(default = "default_max_quantity")]
    pub max_quantity: u32,
}

fn default_min_quantity() -> u32 {
    10
}

fn default_max_quantity() -> u32 {
    100
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            min_quantity: default_min_quantity(),
            max_quantity: default_max_quantity(),
        }
    }
}

impl AdmissionPolicy {
    /// Decide whether a batch of `quantity` units may be attempted.
    ///
    /// Checks run in order and short-circuit on the first failure:
    /// caller connected, machine ready, quantity bounds, funds sufficiency.
    /// Pure decision, no side effects.
    pub fn admit(
        &self,
        quantity: u32,
        unit_price: Decimal,
        funds: &CallerFunds,
        caller_connected: bool,
        machine_ready: bool,
    ) -> Result<AdmittedRequest, AdmissionError> {
        if !caller_connected {
            return Err(AdmissionError::NoCaller);
        }
        if !machine_ready {
            return Err(AdmissionError::MachineNotReady);
        }
        if quantity < self.min_quantity || quantity > self.max_quantity {
            return Err(AdmissionError::QuantityOutOfRange {
                quantity,
                min: self.min_quantity,
                max: self.max_quantity,
            });
        }

        let total_cost = Decimal::from(quantity) * unit_price;
        if total_cost > funds.available {
            return Err(AdmissionError::InsufficientFunds {
                required: total_cost,
                available: funds.available,
            });
        }

        Ok(AdmittedRequest {
            quantity,
            unit_price,
            total_cost,
        })
    }
}
