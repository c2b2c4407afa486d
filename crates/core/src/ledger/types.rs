//! Types for ledger operations.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::machine::IssuanceState;

/// Errors that can terminate a single acquisition operation.
///
/// These are per-unit errors: one rejected operation never affects its
/// siblings in a batch, and the orchestrator never retries them on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// Transport-level failure before the operation reached the ledger.
    #[error("network fault: {0}")]
    NetworkFault(String),

    /// The signing layer refused or failed to sign the operation.
    #[error("signature rejected: {0}")]
    SignatureRejected(String),

    /// The machine ran out of supply while the batch was in flight.
    #[error("supply exhausted")]
    SupplyExhausted,

    /// The operation did not reach a terminal state in time.
    #[error("operation timed out")]
    Timeout,

    /// Anything the gateway did not classify.
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl OperationError {
    /// Whether a caller-initiated retry of this operation could plausibly
    /// succeed. Transient transport problems are retryable; a definitive
    /// on-chain rejection is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OperationError::NetworkFault(_) | OperationError::Timeout
        )
    }

    /// Stable string tag for API responses and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            OperationError::NetworkFault(_) => "network_fault",
            OperationError::SignatureRejected(_) => "signature_rejected",
            OperationError::SupplyExhausted => "supply_exhausted",
            OperationError::Timeout => "timeout",
            OperationError::Unknown(_) => "unknown",
        }
    }
}

/// Errors that can occur while refreshing issuance state or funds.
///
/// Both are recoverable: the synchronizer keeps the previous snapshot and the
/// caller may retry on the next action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The query backend could not be reached or answered garbage.
    #[error("ledger unreachable: {0}")]
    Unreachable(String),

    /// The machine or account does not exist on the ledger.
    #[error("not found: {0}")]
    NotFound(String),
}

/// The caller on whose behalf operations are submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Ledger address of the caller's wallet.
    pub address: String,
}

impl CallerIdentity {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// Funds available to the caller, in the ledger's native coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerFunds {
    pub available: Decimal,
}

impl CallerFunds {
    pub const ZERO: CallerFunds = CallerFunds {
        available: Decimal::ZERO,
    };

    pub fn new(available: Decimal) -> Self {
        Self { available }
    }
}

/// Opaque reference to a fulfilled operation (transaction signature).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationRef(pub String);

impl std::fmt::Display for OperationRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One atomic request to acquire a single unit from the issuance machine.
///
/// Each operation carries a freshly generated asset identity; the machine,
/// collection and authority references are shared across a batch and pinned
/// at admission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionOp {
    /// Unique identity of the asset to be minted.
    pub asset_id: String,
    /// Address of the issuance machine.
    pub machine: String,
    /// Collection the asset joins.
    pub collection: String,
    /// Update authority of the collection.
    pub authority: String,
}

impl AcquisitionOp {
    /// Build an operation against `machine`, minting into the collection and
    /// under the authority recorded in `origin`.
    pub fn new(machine: impl Into<String>, origin: &IssuanceState) -> Self {
        Self {
            asset_id: uuid::Uuid::new_v4().to_string(),
            machine: machine.into(),
            collection: origin.collection.clone(),
            authority: origin.authority.clone(),
        }
    }
}

/// Trait for submitting acquisition operations.
///
/// Implementations own signing and broadcast; a returned `OperationRef` means
/// the operation reached a terminal fulfilled state on the ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Submit one operation and wait for its terminal outcome.
    async fn submit(&self, op: AcquisitionOp) -> Result<OperationRef, OperationError>;
}

/// Trait for read-only ledger queries.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Fetch the issuance machine's current global state.
    async fn fetch_issuance_state(&self, machine: &str) -> Result<IssuanceState, SyncError>;

    /// Fetch the funds available to `identity`.
    async fn fetch_funds(&self, identity: &CallerIdentity) -> Result<CallerFunds, SyncError>;
}
