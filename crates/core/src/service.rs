//! Mint service facade.
//!
//! Wires the price schedule, admission policy, orchestrator and state
//! synchronizer into the flow the API layer drives: snapshot, price, admit,
//! execute, classify, refresh.

use std::sync::Arc;

use tracing::{info, warn};

use crate::admission::{AdmissionError, AdmissionPolicy};
use crate::ledger::{CallerFunds, CallerIdentity, SyncError};
use crate::machine::{MachineStats, StateSynchronizer};
use crate::orchestrator::{BatchOrchestrator, BatchResult};
use crate::pricing::{PriceSchedule, PriceTier};
use crate::report::{classify, MintStatus};

/// Outcome of a completed mint request: the classified status plus the raw
/// batch result for callers that want per-operation detail.
#[derive(Debug, Clone)]
pub struct MintReport {
    pub status: MintStatus,
    pub result: BatchResult,
}

/// End-to-end mint flow against one issuance machine.
pub struct MintService {
    schedule: PriceSchedule,
    policy: AdmissionPolicy,
    orchestrator: BatchOrchestrator,
    synchronizer: Arc<StateSynchronizer>,
    identity: Option<CallerIdentity>,
}

impl MintService {
    pub fn new(
        schedule: PriceSchedule,
        policy: AdmissionPolicy,
        orchestrator: BatchOrchestrator,
        synchronizer: Arc<StateSynchronizer>,
        identity: Option<CallerIdentity>,
    ) -> Self {
        Self {
            schedule,
            policy,
            orchestrator,
            synchronizer,
            identity,
        }
    }

    /// Whether a caller wallet is configured.
    pub fn caller_connected(&self) -> bool {
        self.identity.is_some()
    }

    /// The configured caller identity, if any.
    pub fn identity(&self) -> Option<&CallerIdentity> {
        self.identity.as_ref()
    }

    /// The configured price tiers.
    pub fn tiers(&self) -> &[PriceTier] {
        self.schedule.tiers()
    }

    /// Funds from the current snapshot, if the caller is known and a
    /// snapshot exists.
    pub async fn funds(&self) -> Option<CallerFunds> {
        self.synchronizer.current().await.and_then(|s| s.funds)
    }

    /// Display stats for the current snapshot, priced at the current tier.
    pub async fn stats(&self) -> Option<MachineStats> {
        let snapshot = self.synchronizer.current().await?;
        let unit_price = self.schedule.resolve(snapshot.state.items_redeemed);
        Some(MachineStats::from_state(&snapshot.state, unit_price))
    }

    /// Force a state refresh, fetching funds when a caller is configured.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        self.synchronizer.refresh(self.identity.as_ref()).await?;
        Ok(())
    }

    /// Mint `quantity` units as one batch.
    ///
    /// Admission runs against the snapshot as it stands; prices are never
    /// re-resolved mid-batch, so a tier boundary crossed while operations are
    /// in flight does not change what this batch pays. State is refreshed
    /// after the batch settles regardless of its outcome, and a failed
    /// refresh is advisory only.
    pub async fn mint(&self, quantity: u32) -> Result<MintReport, AdmissionError> {
        let snapshot = self.synchronizer.current().await;
        let machine_ready = snapshot.is_some();
        let caller_connected = self.identity.is_some();

        // With no snapshot there is no price to resolve; the zero placeholder
        // is unreachable because admission rejects before the funds check.
        let (unit_price, funds) = match &snapshot {
            Some(snapshot) => (
                self.schedule.resolve(snapshot.state.items_redeemed),
                snapshot.funds.unwrap_or(CallerFunds::ZERO),
            ),
            None => (rust_decimal::Decimal::ZERO, CallerFunds::ZERO),
        };

        let admitted = self.policy.admit(
            quantity,
            unit_price,
            &funds,
            caller_connected,
            machine_ready,
        )?;

        info!(
            quantity = admitted.quantity,
            unit_price = %admitted.unit_price,
            total_cost = %admitted.total_cost,
            "mint request admitted"
        );

        // machine_ready above guarantees the snapshot.
        let origin = match snapshot {
            Some(snapshot) => snapshot.state,
            None => return Err(AdmissionError::MachineNotReady),
        };

        let result = self.orchestrator.execute(&admitted, &origin).await;
        let status = classify(&result);

        if let Err(e) = self.synchronizer.refresh(self.identity.as_ref()).await {
            warn!(error = %e, "post-batch state refresh failed");
        }

        Ok(MintReport { status, result })
    }
}
