use std::sync::Arc;

use chrono::{DateTime, Utc};
use gumball_core::{MintService, StateSynchronizer};

/// Shared application state
pub struct AppState {
    service: MintService,
    synchronizer: Arc<StateSynchronizer>,
    started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: MintService, synchronizer: Arc<StateSynchronizer>) -> Self {
        Self {
            service,
            synchronizer,
            started_at: Utc::now(),
        }
    }

    pub fn service(&self) -> &MintService {
        &self.service
    }

    pub fn synchronizer(&self) -> &StateSynchronizer {
        &self.synchronizer
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
