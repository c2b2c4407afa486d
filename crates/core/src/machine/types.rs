//! Types for issuance machine state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::CallerFunds;

/// Global state of the issuance machine as read from the ledger.
///
/// Invariant: `items_redeemed <= items_available`. Snapshots violating it are
/// rejected at the query boundary and never reach this type's consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceState {
    /// Units redeemed so far.
    pub items_redeemed: u64,
    /// Total fixed supply.
    pub items_available: u64,
    /// Update authority of the collection.
    pub authority: String,
    /// Collection minted assets join.
    pub collection: String,
}

impl IssuanceState {
    /// Units still available.
    pub fn remaining(&self) -> u64 {
        self.items_available.saturating_sub(self.items_redeemed)
    }

    /// Redemption progress in percent, 0.0 for an empty machine.
    pub fn progress_pct(&self) -> f64 {
        if self.items_available == 0 {
            return 0.0;
        }
        (self.items_redeemed as f64 / self.items_available as f64) * 100.0
    }

    /// Whether the redeemed count is within the supply.
    pub fn is_consistent(&self) -> bool {
        self.items_redeemed <= self.items_available
    }

    pub fn sold_out(&self) -> bool {
        self.remaining() == 0
    }
}

/// One atomic refresh of issuance state and, when the caller is known, funds.
///
/// Consumed by value; only the synchronizer produces new ones.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    pub state: IssuanceState,
    /// Caller funds, present when an identity was supplied to the refresh.
    pub funds: Option<CallerFunds>,
    pub fetched_at: DateTime<Utc>,
}

/// Display stats derived from a snapshot for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct MachineStats {
    pub items_redeemed: u64,
    pub items_available: u64,
    pub remaining_supply: u64,
    pub progress_pct: f64,
    /// Current unit price at this redemption count.
    pub unit_price: Decimal,
}

impl MachineStats {
    pub fn from_state(state: &IssuanceState, unit_price: Decimal) -> Self {
        Self {
            items_redeemed: state.items_redeemed,
            items_available: state.items_available,
            remaining_supply: state.remaining(),
            progress_pct: state.progress_pct(),
            unit_price,
        }
    }
}
