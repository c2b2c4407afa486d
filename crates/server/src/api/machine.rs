//! Issuance machine and wallet API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use gumball_core::{MachineStats, PriceTier, SyncError};

use crate::metrics::STATE_REFRESHES_TOTAL;
use crate::state::AppState;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Get current machine stats from the local snapshot.
///
/// 503 until the first successful refresh; no snapshot means no price and no
/// progress to report.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MachineStats>, (StatusCode, Json<ErrorResponse>)> {
    match state.service().stats().await {
        Some(stats) => Ok(Json(stats)),
        None => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("issuance machine not ready")),
        )),
    }
}

#[derive(Debug, Serialize)]
pub struct TiersResponse {
    pub tiers: Vec<PriceTier>,
}

/// List the configured price tiers.
pub async fn get_tiers(State(state): State<Arc<AppState>>) -> Json<TiersResponse> {
    Json(TiersResponse {
        tiers: state.service().tiers().to_vec(),
    })
}

/// Force a state refresh against the ledger.
pub async fn refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.service().refresh().await {
        Ok(()) => {
            STATE_REFRESHES_TOTAL.with_label_values(&["ok"]).inc();
            match state.service().stats().await {
                Some(stats) => (StatusCode::OK, Json(stats)).into_response(),
                None => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse::new("issuance machine not ready")),
                )
                    .into_response(),
            }
        }
        Err(e) => {
            STATE_REFRESHES_TOTAL.with_label_values(&["error"]).inc();
            let status = match &e {
                SyncError::NotFound(_) => StatusCode::NOT_FOUND,
                SyncError::Unreachable(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WalletResponse {
    pub address: String,
    /// Funds from the current snapshot; absent until the first refresh with
    /// a connected caller.
    pub available: Option<Decimal>,
}

/// Get the configured caller wallet and its funds.
pub async fn get_wallet(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WalletResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.service().identity() {
        Some(identity) => {
            let funds = state.service().funds().await;
            Ok(Json(WalletResponse {
                address: identity.address.clone(),
                available: funds.map(|f| f.available),
            }))
        }
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("no caller connected")),
        )),
    }
}
