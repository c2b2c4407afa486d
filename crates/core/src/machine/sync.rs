//! State synchronizer.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::ledger::{CallerIdentity, LedgerQuery, SyncError};

use super::types::StateSnapshot;

/// Owns the local view of the issuance machine.
///
/// `refresh` is called once at startup and after every completed batch;
/// readiness transitions false→true on the first success and never back. A
/// failed refresh keeps the previous snapshot in place (stale but valid data
/// beats a silent reset to zero) and reports the error as advisory.
pub struct StateSynchronizer {
    machine_id: String,
    query: Arc<dyn LedgerQuery>,
    snapshot: RwLock<Option<StateSnapshot>>,
}

impl StateSynchronizer {
    pub fn new(machine_id: impl Into<String>, query: Arc<dyn LedgerQuery>) -> Self {
        Self {
            machine_id: machine_id.into(),
            query,
            snapshot: RwLock::new(None),
        }
    }

    /// Address of the machine being tracked.
    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    /// Whether issuance state has been loaded at least once.
    pub async fn is_ready(&self) -> bool {
        self.snapshot.read().await.is_some()
    }

    /// The current snapshot, if one has been loaded.
    pub async fn current(&self) -> Option<StateSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// Re-fetch issuance state and, when `identity` is supplied, caller
    /// funds. The stored snapshot is replaced wholesale on success only.
    pub async fn refresh(
        &self,
        identity: Option<&CallerIdentity>,
    ) -> Result<StateSnapshot, SyncError> {
        let state = match self.query.fetch_issuance_state(&self.machine_id).await {
            Ok(state) => state,
            Err(e) => {
                warn!(machine = %self.machine_id, error = %e, "issuance state refresh failed, keeping previous snapshot");
                return Err(e);
            }
        };

        let funds = match identity {
            Some(identity) => match self.query.fetch_funds(identity).await {
                Ok(funds) => Some(funds),
                Err(e) => {
                    warn!(address = %identity.address, error = %e, "funds refresh failed, keeping previous snapshot");
                    return Err(e);
                }
            },
            None => None,
        };

        let snapshot = StateSnapshot {
            state,
            funds,
            fetched_at: Utc::now(),
        };

        let mut guard = self.snapshot.write().await;
        let first = guard.is_none();
        *guard = Some(snapshot.clone());
        drop(guard);

        if first {
            info!(
                machine = %self.machine_id,
                items_redeemed = snapshot.state.items_redeemed,
                items_available = snapshot.state.items_available,
                "issuance machine loaded"
            );
        } else {
            debug!(
                machine = %self.machine_id,
                items_redeemed = snapshot.state.items_redeemed,
                "issuance state refreshed"
            );
        }

        Ok(snapshot)
    }
}
