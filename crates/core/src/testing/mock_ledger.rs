//! Mock ledger for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::ledger::{
    AcquisitionOp, CallerFunds, CallerIdentity, LedgerClient, LedgerQuery, OperationError,
    OperationRef, SyncError,
};
use crate::machine::IssuanceState;

/// Mock implementation of both `LedgerClient` and `LedgerQuery`.
///
/// Behaves like a tiny in-memory issuance machine with controllable failure:
/// - Inject rejections for specific submission arrivals
/// - Delay submissions to exercise concurrency and abandonment
/// - Inject query errors to exercise stale-snapshot handling
/// - Track submitted operations and peak concurrency for assertions
///
/// Fulfilled operations increment the redeemed count, so a refresh after a
/// batch observes the machine the way a real ledger would show it.
pub struct MockLedger {
    machine_id: String,
    state: RwLock<IssuanceState>,
    balances: RwLock<HashMap<String, Decimal>>,
    /// Rejections keyed by submission arrival order (0-based).
    rejections: RwLock<HashMap<usize, OperationError>>,
    submitted: RwLock<Vec<AcquisitionOp>>,
    submit_delay: RwLock<Option<Duration>>,
    next_sync_error: RwLock<Option<SyncError>>,
    submit_count: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockLedger {
    /// Create a machine with the given fixed supply and nothing redeemed.
    pub fn new(machine_id: impl Into<String>, items_available: u64) -> Self {
        Self {
            machine_id: machine_id.into(),
            state: RwLock::new(IssuanceState {
                items_redeemed: 0,
                items_available,
                authority: "mock-authority".to_string(),
                collection: "mock-collection".to_string(),
            }),
            balances: RwLock::new(HashMap::new()),
            rejections: RwLock::new(HashMap::new()),
            submitted: RwLock::new(Vec::new()),
            submit_delay: RwLock::new(None),
            next_sync_error: RwLock::new(None),
            submit_count: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Set the redeemed count directly.
    pub async fn set_redeemed(&self, items_redeemed: u64) {
        self.state.write().await.items_redeemed = items_redeemed;
    }

    /// Set the balance for an account.
    pub async fn set_balance(&self, address: impl Into<String>, available: Decimal) {
        self.balances.write().await.insert(address.into(), available);
    }

    /// Reject the `index`-th submission to arrive (0-based) with `error`.
    pub async fn reject_at(&self, index: usize, error: OperationError) {
        self.rejections.write().await.insert(index, error);
    }

    /// Delay every submission by `delay`.
    pub async fn set_submit_delay(&self, delay: Duration) {
        *self.submit_delay.write().await = Some(delay);
    }

    /// Fail the next query with `error` (consumed by the next call).
    pub async fn set_next_sync_error(&self, error: SyncError) {
        *self.next_sync_error.write().await = Some(error);
    }

    /// All operations submitted so far, in arrival order.
    pub async fn submitted_ops(&self) -> Vec<AcquisitionOp> {
        self.submitted.read().await.clone()
    }

    /// Peak number of concurrently in-flight submissions observed.
    pub fn max_in_flight_seen(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn take_sync_error(&self) -> Option<SyncError> {
        self.next_sync_error.write().await.take()
    }

    fn enter_submit(&self) -> usize {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.submit_count.fetch_add(1, Ordering::SeqCst)
    }

    fn leave_submit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    fn name(&self) -> &str {
        "mock"
    }

    async fn submit(&self, op: AcquisitionOp) -> Result<OperationRef, OperationError> {
        let arrival = self.enter_submit();

        let delay = *self.submit_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.submitted.write().await.push(op);

        let injected = self.rejections.write().await.remove(&arrival);
        let result = if let Some(error) = injected {
            Err(error)
        } else {
            let mut state = self.state.write().await;
            if state.items_redeemed >= state.items_available {
                Err(OperationError::SupplyExhausted)
            } else {
                state.items_redeemed += 1;
                Ok(OperationRef(format!("op-{arrival:05}")))
            }
        };

        self.leave_submit();
        result
    }
}

#[async_trait]
impl LedgerQuery for MockLedger {
    async fn fetch_issuance_state(&self, machine: &str) -> Result<IssuanceState, SyncError> {
        if let Some(error) = self.take_sync_error().await {
            return Err(error);
        }
        if machine != self.machine_id {
            return Err(SyncError::NotFound(machine.to_string()));
        }
        Ok(self.state.read().await.clone())
    }

    async fn fetch_funds(&self, identity: &CallerIdentity) -> Result<CallerFunds, SyncError> {
        if let Some(error) = self.take_sync_error().await {
            return Err(error);
        }
        self.balances
            .read()
            .await
            .get(&identity.address)
            .map(|available| CallerFunds::new(*available))
            .ok_or_else(|| SyncError::NotFound(identity.address.clone()))
    }
}
