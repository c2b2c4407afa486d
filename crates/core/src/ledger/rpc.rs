//! Mint gateway ledger implementation.
//!
//! Talks to a hosted mint gateway over HTTP/JSON. The gateway wraps the
//! chain's RPC node and the signing service: submitting an operation here
//! returns only once the transaction is confirmed or terminally rejected.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::machine::IssuanceState;

use super::{
    AcquisitionOp, CallerFunds, CallerIdentity, LedgerClient, LedgerQuery, OperationError,
    OperationRef, SyncError,
};

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    signature: String,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    available: rust_decimal::Decimal,
}

/// HTTP client for the mint gateway.
pub struct RpcLedgerClient {
    client: Client,
    config: GatewayConfig,
}

impl RpcLedgerClient {
    /// Create a new gateway client.
    ///
    /// No client-wide timeout: a submit waits as long as the orchestrator's
    /// per-operation ceiling allows, while queries bound themselves with
    /// `request_timeout_secs` per request.
    pub fn new(config: GatewayConfig) -> Result<Self, SyncError> {
        let client = Client::builder()
            .build()
            .map_err(|e| SyncError::Unreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs)
    }

    /// Map a non-success HTTP status from the submit endpoint to the
    /// per-operation error taxonomy.
    fn map_submit_status(status: StatusCode, body: &str) -> OperationError {
        match status.as_u16() {
            401 | 403 => OperationError::SignatureRejected(truncate(body)),
            409 | 410 => OperationError::SupplyExhausted,
            408 | 504 => OperationError::Timeout,
            _ => OperationError::Unknown(format!("HTTP {status}: {}", truncate(body))),
        }
    }

    fn map_submit_transport(e: reqwest::Error) -> OperationError {
        if e.is_timeout() {
            OperationError::Timeout
        } else {
            OperationError::NetworkFault(e.to_string())
        }
    }

    fn map_query_transport(e: reqwest::Error) -> SyncError {
        SyncError::Unreachable(e.to_string())
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    fn name(&self) -> &str {
        "gateway"
    }

    async fn submit(&self, op: AcquisitionOp) -> Result<OperationRef, OperationError> {
        let url = format!("{}/v1/operations", self.base_url());
        debug!(asset_id = %op.asset_id, machine = %op.machine, "submitting acquisition operation");

        let response = self
            .client
            .post(&url)
            .json(&op)
            .send()
            .await
            .map_err(Self::map_submit_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = Self::map_submit_status(status, &body);
            warn!(asset_id = %op.asset_id, %status, error = %err, "operation rejected by gateway");
            return Err(err);
        }

        let parsed: SubmitResponse = response
            .json()
            .await
            .map_err(|e| OperationError::Unknown(format!("malformed submit response: {e}")))?;

        Ok(OperationRef(parsed.signature))
    }
}

#[async_trait]
impl LedgerQuery for RpcLedgerClient {
    async fn fetch_issuance_state(&self, machine: &str) -> Result<IssuanceState, SyncError> {
        let url = format!("{}/v1/machines/{}", self.base_url(), machine);

        let response = self
            .client
            .get(&url)
            .timeout(self.query_timeout())
            .send()
            .await
            .map_err(Self::map_query_transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(machine.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Unreachable(format!(
                "HTTP {status}: {}",
                truncate(&body)
            )));
        }

        let state: IssuanceState = response
            .json()
            .await
            .map_err(|e| SyncError::Unreachable(format!("malformed machine state: {e}")))?;

        if !state.is_consistent() {
            // A snapshot claiming more redeemed than available is garbage;
            // keep whatever we had rather than poisoning downstream pricing.
            warn!(
                items_redeemed = state.items_redeemed,
                items_available = state.items_available,
                "gateway returned inconsistent issuance state"
            );
            return Err(SyncError::Unreachable(
                "inconsistent issuance state from gateway".to_string(),
            ));
        }

        Ok(state)
    }

    async fn fetch_funds(&self, identity: &CallerIdentity) -> Result<CallerFunds, SyncError> {
        let url = format!(
            "{}/v1/accounts/{}/balance",
            self.base_url(),
            identity.address
        );

        let response = self
            .client
            .get(&url)
            .timeout(self.query_timeout())
            .send()
            .await
            .map_err(Self::map_query_transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(identity.address.clone()));
        }
        if !status.is_success() {
            return Err(SyncError::Unreachable(format!("HTTP {status}")));
        }

        let parsed: BalanceResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Unreachable(format!("malformed balance response: {e}")))?;

        Ok(CallerFunds::new(parsed.available))
    }
}
