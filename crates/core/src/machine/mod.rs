//! Issuance machine state.
//!
//! The machine's global state lives on the remote ledger; this module owns
//! the local read model: an immutable snapshot replaced wholesale on every
//! refresh, so readers never observe a torn mix of old and new counts.

mod sync;
mod types;

pub use sync::StateSynchronizer;
pub use types::{IssuanceState, MachineStats, StateSnapshot};
