//! Ledger abstraction.
//!
//! This module provides the `LedgerClient` and `LedgerQuery` traits for
//! submitting acquisition operations and reading issuance state across
//! backends (hosted mint gateway, test mocks). Signing and broadcast are the
//! backend's concern; nothing here holds keys.

mod rpc;
mod types;

pub use rpc::RpcLedgerClient;
pub use types::*;
