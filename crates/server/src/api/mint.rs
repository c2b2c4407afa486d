//! Mint API handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use gumball_core::{AdmissionError, MintReport, OperationRef};

use crate::metrics::{
    ADMISSION_REJECTIONS_TOTAL, MINT_BATCHES_TOTAL, OPERATIONS_FULFILLED_TOTAL,
    OPERATIONS_REJECTED_TOTAL,
};
use crate::state::AppState;

use super::machine::ErrorResponse;

/// Request body for minting a batch
#[derive(Debug, Deserialize)]
pub struct MintRequest {
    /// Number of units to acquire as one batch
    pub quantity: u32,
}

/// One rejected operation in the response
#[derive(Debug, Serialize)]
pub struct RejectedOpBody {
    /// Submission-order index within the batch
    pub index: u32,
    pub kind: &'static str,
    pub error: String,
    /// Whether a caller-initiated retry could plausibly succeed
    pub retryable: bool,
}

/// Response for a settled mint batch
#[derive(Debug, Serialize)]
pub struct MintResponse {
    pub status: &'static str,
    pub message: String,
    pub requested: u32,
    pub fulfilled: Vec<OperationRef>,
    pub rejected: Vec<RejectedOpBody>,
    pub abandoned: bool,
}

impl From<MintReport> for MintResponse {
    fn from(report: MintReport) -> Self {
        Self {
            status: report.status.kind(),
            message: report.status.message(),
            requested: report.result.requested,
            fulfilled: report.result.fulfilled,
            rejected: report
                .result
                .rejected
                .into_iter()
                .map(|r| RejectedOpBody {
                    index: r.index,
                    kind: r.error.kind(),
                    error: r.error.to_string(),
                    retryable: r.error.is_retryable(),
                })
                .collect(),
            abandoned: report.result.abandoned,
        }
    }
}

fn admission_status(error: &AdmissionError) -> StatusCode {
    match error {
        AdmissionError::NoCaller => StatusCode::CONFLICT,
        AdmissionError::MachineNotReady => StatusCode::SERVICE_UNAVAILABLE,
        AdmissionError::QuantityOutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AdmissionError::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
    }
}

/// Mint a batch of units.
///
/// Admission failures return an error status; a batch that ran returns 200
/// with the classified outcome, partial failure included.
pub async fn mint(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MintRequest>,
) -> impl IntoResponse {
    match state.service().mint(body.quantity).await {
        Ok(report) => {
            MINT_BATCHES_TOTAL
                .with_label_values(&[report.status.kind()])
                .inc();
            OPERATIONS_FULFILLED_TOTAL.inc_by(report.result.fulfilled.len() as u64);
            for rejected in &report.result.rejected {
                OPERATIONS_REJECTED_TOTAL
                    .with_label_values(&[rejected.error.kind()])
                    .inc();
            }

            (StatusCode::OK, Json(MintResponse::from(report))).into_response()
        }
        Err(e) => {
            ADMISSION_REJECTIONS_TOTAL
                .with_label_values(&[e.kind()])
                .inc();
            (
                admission_status(&e),
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}
