//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the gumball server:
//! - Mint batch outcomes by status
//! - Per-operation fulfillment and rejection counts
//! - State refresh outcomes
//! - Issuance machine progress (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Mint batches settled, by classified status.
pub static MINT_BATCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("gumball_mint_batches_total", "Settled mint batches"),
        &["status"],
    )
    .unwrap()
});

/// Acquisition operations fulfilled.
pub static OPERATIONS_FULFILLED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "gumball_operations_fulfilled_total",
        "Acquisition operations fulfilled on the ledger",
    )
    .unwrap()
});

/// Acquisition operations rejected, by error kind.
pub static OPERATIONS_REJECTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gumball_operations_rejected_total",
            "Acquisition operations rejected",
        ),
        &["kind"],
    )
    .unwrap()
});

/// Mint requests rejected at admission, by error kind.
pub static ADMISSION_REJECTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gumball_admission_rejections_total",
            "Mint requests rejected before submission",
        ),
        &["kind"],
    )
    .unwrap()
});

/// Issuance state refreshes, by outcome.
pub static STATE_REFRESHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gumball_state_refreshes_total",
            "Issuance state refresh attempts",
        ),
        &["outcome"],
    )
    .unwrap()
});

/// Units redeemed on the machine (collected dynamically).
pub static MACHINE_ITEMS_REDEEMED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "gumball_machine_items_redeemed",
        "Units redeemed on the issuance machine",
    )
    .unwrap()
});

/// Remaining supply on the machine (collected dynamically).
pub static MACHINE_REMAINING_SUPPLY: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "gumball_machine_remaining_supply",
        "Units remaining on the issuance machine",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(MINT_BATCHES_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(OPERATIONS_FULFILLED_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(OPERATIONS_REJECTED_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(ADMISSION_REJECTIONS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(STATE_REFRESHES_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(MACHINE_ITEMS_REDEEMED.clone()))
        .unwrap();
    registry
        .register(Box::new(MACHINE_REMAINING_SUPPLY.clone()))
        .unwrap();
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Update machine gauges from the current snapshot, if one exists.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Some(stats) = state.service().stats().await {
        MACHINE_ITEMS_REDEEMED.set(stats.items_redeemed as i64);
        MACHINE_REMAINING_SUPPLY.set(stats.remaining_supply as i64);
    }
}
