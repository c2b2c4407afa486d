use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, machine, mint};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Issuance machine
        .route("/machine/stats", get(machine::get_stats))
        .route("/machine/tiers", get(machine::get_tiers))
        .route("/machine/refresh", post(machine::refresh))
        // Caller wallet
        .route("/wallet", get(machine::get_wallet))
        // Minting
        .route("/mint", post(mint::mint));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
