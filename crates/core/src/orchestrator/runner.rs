//! Batch orchestrator implementation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Semaphore};
use tracing::{debug, info, warn};

use crate::admission::AdmittedRequest;
use crate::ledger::{AcquisitionOp, LedgerClient, OperationError};
use crate::machine::IssuanceState;

use super::config::OrchestratorConfig;
use super::types::{AcquisitionOutcome, BatchResult, RejectedOp};

/// Executes admitted requests as batches of independent operations.
///
/// All-or-nothing semantics are deliberately absent: the ledger offers no
/// cross-operation atomicity, and a caller who can rightfully acquire 40 of
/// 50 requested units should keep those 40 when the other 10 fail.
pub struct BatchOrchestrator {
    config: OrchestratorConfig,
    machine_id: String,
    ledger: Arc<dyn LedgerClient>,
}

impl BatchOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        machine_id: impl Into<String>,
        ledger: Arc<dyn LedgerClient>,
    ) -> Self {
        Self {
            config,
            machine_id: machine_id.into(),
            ledger,
        }
    }

    /// Execute an admitted batch to completion.
    ///
    /// `origin` pins the collection/authority references captured at
    /// admission time; every operation in the batch shares them.
    pub async fn execute(&self, admitted: &AdmittedRequest, origin: &IssuanceState) -> BatchResult {
        // Sender kept alive for the whole run so the abandon arm stays quiet.
        let (_abandon_tx, abandon_rx) = broadcast::channel(1);
        self.run(admitted, origin, abandon_rx).await
    }

    /// Execute an admitted batch, stopping early if `abandon` fires.
    ///
    /// Abandoning only stops waiting and reporting: submitted operations
    /// cannot be retracted from the ledger, so the spawned tasks run to their
    /// terminal outcome either way. The returned result is marked abandoned
    /// and classifies as a status distinct from failure.
    pub async fn execute_with_abandon(
        &self,
        admitted: &AdmittedRequest,
        origin: &IssuanceState,
        abandon: broadcast::Receiver<()>,
    ) -> BatchResult {
        self.run(admitted, origin, abandon).await
    }

    async fn run(
        &self,
        admitted: &AdmittedRequest,
        origin: &IssuanceState,
        mut abandon: broadcast::Receiver<()>,
    ) -> BatchResult {
        let quantity = admitted.quantity as usize;
        let permits = match self.config.max_in_flight {
            0 => quantity.max(1),
            n => n,
        };
        let semaphore = Arc::new(Semaphore::new(permits));
        let timeout = Duration::from_secs(self.config.operation_timeout_secs);

        info!(
            machine = %self.machine_id,
            quantity,
            max_in_flight = permits,
            unit_price = %admitted.unit_price,
            "submitting acquisition batch"
        );

        // Fan out: each operation is an independent detached task. No
        // operation depends on another's outcome, and a rejection never
        // cancels a sibling.
        let mut handles = Vec::with_capacity(quantity);
        for _ in 0..quantity {
            let op = AcquisitionOp::new(&self.machine_id, origin);
            let ledger = Arc::clone(&self.ledger);
            let semaphore = Arc::clone(&semaphore);

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return AcquisitionOutcome::Rejected(OperationError::Unknown(
                            "submission pool closed".to_string(),
                        ))
                    }
                };
                match tokio::time::timeout(timeout, ledger.submit(op)).await {
                    Ok(Ok(op_ref)) => AcquisitionOutcome::Fulfilled(op_ref),
                    Ok(Err(e)) => AcquisitionOutcome::Rejected(e),
                    Err(_) => AcquisitionOutcome::Rejected(OperationError::Timeout),
                }
            }));
        }

        // Collect in submission order so repeated runs with identical timing
        // produce a reproducible result ordering.
        let mut result = BatchResult::new(admitted.quantity);
        for (index, handle) in handles.into_iter().enumerate() {
            let outcome = tokio::select! {
                joined = handle => match joined {
                    Ok(outcome) => outcome,
                    Err(e) => AcquisitionOutcome::Rejected(OperationError::Unknown(format!(
                        "submission task failed: {e}"
                    ))),
                },
                _ = wait_for_abandon(&mut abandon) => {
                    warn!(
                        machine = %self.machine_id,
                        resolved = index,
                        requested = quantity,
                        "batch abandoned; in-flight operations left to finish"
                    );
                    result.abandoned = true;
                    break;
                }
            };

            match outcome {
                AcquisitionOutcome::Fulfilled(op_ref) => {
                    debug!(index, op_ref = %op_ref, "operation fulfilled");
                    result.fulfilled.push(op_ref);
                }
                AcquisitionOutcome::Rejected(error) => {
                    warn!(index, error = %error, "operation rejected");
                    result.rejected.push(RejectedOp {
                        index: index as u32,
                        error,
                    });
                }
            }
        }

        info!(
            machine = %self.machine_id,
            requested = result.requested,
            fulfilled = result.fulfilled.len(),
            rejected = result.rejected.len(),
            abandoned = result.abandoned,
            "batch settled"
        );

        result
    }
}

/// Resolve when an abandon signal arrives; never resolve once the sender side
/// is gone (a dropped handle must not look like an abandon).
async fn wait_for_abandon(rx: &mut broadcast::Receiver<()>) {
    use tokio::sync::broadcast::error::RecvError;
    loop {
        match rx.recv().await {
            Ok(()) => return,
            // Lagged still means a signal was sent.
            Err(RecvError::Lagged(_)) => return,
            Err(RecvError::Closed) => std::future::pending::<()>().await,
        }
    }
}
