//! End-to-end tests for the mint API against a mock ledger.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestConfig, TestFixture};
use gumball_core::{OperationError, SyncError};

#[tokio::test]
async fn test_health_reports_ready_machine() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["machine_ready"], true);
}

#[tokio::test]
async fn test_health_before_first_refresh() {
    let fixture = TestFixture::with_config(TestConfig::not_ready()).await;

    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["machine_ready"], false);
}

#[tokio::test]
async fn test_stats_reflect_snapshot_and_tier_price() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/machine/stats").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["items_redeemed"], 50_000);
    assert_eq!(response.body["items_available"], 250_000);
    assert_eq!(response.body["remaining_supply"], 200_000);
    assert_eq!(response.body["unit_price"], "0.005");
}

#[tokio::test]
async fn test_stats_price_moves_past_tier_boundary() {
    let fixture = TestFixture::with_config(TestConfig::with_redeemed(100_000)).await;

    let response = fixture.get("/api/v1/machine/stats").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["unit_price"], "0.01");
}

#[tokio::test]
async fn test_stats_unavailable_before_first_refresh() {
    let fixture = TestFixture::with_config(TestConfig::not_ready()).await;

    let response = fixture.get("/api/v1/machine/stats").await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_tiers_endpoint_lists_schedule() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/machine/tiers").await;
    assert_status!(response, StatusCode::OK);
    let tiers = response.body["tiers"].as_array().unwrap();
    assert_eq!(tiers.len(), 2);
    assert_eq!(tiers[0]["threshold"], 0);
    assert_eq!(tiers[1]["threshold"], 100_000);
}

#[tokio::test]
async fn test_mint_all_succeeded() {
    let fixture = TestFixture::new().await;

    let response = fixture.post("/api/v1/mint", json!({ "quantity": 10 })).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "all_succeeded");
    assert_eq!(response.body["requested"], 10);
    assert_eq!(response.body["fulfilled"].as_array().unwrap().len(), 10);
    assert_eq!(response.body["rejected"].as_array().unwrap().len(), 0);
    assert_eq!(response.body["abandoned"], false);

    // The post-batch refresh shows the machine moved forward.
    let stats = fixture.get("/api/v1/machine/stats").await;
    assert_eq!(stats.body["items_redeemed"], 50_010);
}

#[tokio::test]
async fn test_mint_partial_success_reports_rejections() {
    let fixture = TestFixture::new().await;
    fixture
        .ledger
        .reject_at(2, OperationError::NetworkFault("reset".to_string()))
        .await;
    fixture.ledger.reject_at(7, OperationError::SupplyExhausted).await;

    let response = fixture.post("/api/v1/mint", json!({ "quantity": 10 })).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "partial_success");
    assert_eq!(response.body["fulfilled"].as_array().unwrap().len(), 8);

    let rejected = response.body["rejected"].as_array().unwrap();
    assert_eq!(rejected.len(), 2);
    assert_eq!(rejected[0]["index"], 2);
    assert_eq!(rejected[0]["kind"], "network_fault");
    assert_eq!(rejected[0]["retryable"], true);
    assert_eq!(rejected[1]["index"], 7);
    assert_eq!(rejected[1]["kind"], "supply_exhausted");
    assert_eq!(rejected[1]["retryable"], false);
}

#[tokio::test]
async fn test_mint_all_failed() {
    let fixture = TestFixture::new().await;
    for index in 0..10usize {
        fixture
            .ledger
            .reject_at(index, OperationError::SupplyExhausted)
            .await;
    }

    let response = fixture.post("/api/v1/mint", json!({ "quantity": 10 })).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "all_failed");
    assert_eq!(response.body["fulfilled"].as_array().unwrap().len(), 0);
    assert_eq!(response.body["rejected"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_mint_rejects_quantity_out_of_range() {
    let fixture = TestFixture::new().await;

    let low = fixture.post("/api/v1/mint", json!({ "quantity": 9 })).await;
    assert_status!(low, StatusCode::UNPROCESSABLE_ENTITY);

    let high = fixture.post("/api/v1/mint", json!({ "quantity": 101 })).await;
    assert_status!(high, StatusCode::UNPROCESSABLE_ENTITY);

    // Boundaries are admitted.
    let boundary = fixture.post("/api/v1/mint", json!({ "quantity": 10 })).await;
    assert_status!(boundary, StatusCode::OK);
}

#[tokio::test]
async fn test_mint_rejects_insufficient_funds() {
    let fixture = TestFixture::with_config(TestConfig::with_balance("0.04")).await;

    let response = fixture.post("/api/v1/mint", json!({ "quantity": 10 })).await;
    assert_status!(response, StatusCode::PAYMENT_REQUIRED);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("insufficient funds"));

    // Nothing reached the ledger.
    assert!(fixture.ledger.submitted_ops().await.is_empty());
}

#[tokio::test]
async fn test_mint_rejects_without_wallet() {
    let fixture = TestFixture::with_config(TestConfig::without_wallet()).await;

    let response = fixture.post("/api/v1/mint", json!({ "quantity": 10 })).await;
    assert_status!(response, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_mint_rejects_before_first_refresh() {
    let fixture = TestFixture::with_config(TestConfig::not_ready()).await;

    let response = fixture.post("/api/v1/mint", json!({ "quantity": 10 })).await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_refresh_picks_up_external_mutation() {
    let fixture = TestFixture::new().await;
    fixture.ledger.set_redeemed(60_000).await;

    let response = fixture.post("/api/v1/machine/refresh", json!({})).await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["items_redeemed"], 60_000);
}

#[tokio::test]
async fn test_failed_refresh_keeps_stale_snapshot() {
    let fixture = TestFixture::new().await;
    fixture
        .ledger
        .set_next_sync_error(SyncError::Unreachable("down".to_string()))
        .await;

    let response = fixture.post("/api/v1/machine/refresh", json!({})).await;
    assert_status!(response, StatusCode::BAD_GATEWAY);

    // Stale snapshot is still served.
    let stats = fixture.get("/api/v1/machine/stats").await;
    assert_status!(stats, StatusCode::OK);
    assert_eq!(stats.body["items_redeemed"], 50_000);
}

#[tokio::test]
async fn test_wallet_endpoint_reports_funds() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/wallet").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["address"], common::WALLET);
    assert_eq!(response.body["available"], "1.0");
}

#[tokio::test]
async fn test_wallet_endpoint_without_wallet() {
    let fixture = TestFixture::with_config(TestConfig::without_wallet()).await;

    let response = fixture.get("/api/v1/wallet").await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_prometheus_text() {
    let fixture = TestFixture::new().await;
    fixture.post("/api/v1/mint", json!({ "quantity": 10 })).await;

    let (status, body) = fixture.get_text("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("gumball_mint_batches_total"));
    assert!(body.contains("gumball_machine_items_redeemed"));
}
