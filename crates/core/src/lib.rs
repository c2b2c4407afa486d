//! Core library for the gumball batch acquisition service.
//!
//! Drives batches of single-unit acquisition operations against a
//! fixed-supply, tiered-price issuance machine: admission checks, bounded
//! concurrent fan-out, submission-order aggregation, state synchronization
//! and result classification.

pub mod admission;
pub mod config;
pub mod ledger;
pub mod machine;
pub mod orchestrator;
pub mod pricing;
pub mod report;
pub mod service;
pub mod testing;

pub use admission::{AdmissionError, AdmissionPolicy, AdmittedRequest};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, GatewayConfig,
    MachineConfig, PricingConfig, ServerConfig, WalletConfig,
};
pub use ledger::{
    AcquisitionOp, CallerFunds, CallerIdentity, LedgerClient, LedgerQuery, OperationError,
    OperationRef, RpcLedgerClient, SyncError,
};
pub use machine::{IssuanceState, MachineStats, StateSnapshot, StateSynchronizer};
pub use orchestrator::{
    AcquisitionOutcome, BatchOrchestrator, BatchResult, OrchestratorConfig, RejectedOp,
};
pub use pricing::{PriceSchedule, PriceTier};
pub use report::{classify, MintStatus};
pub use service::{MintReport, MintService};
