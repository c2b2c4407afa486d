//! Common test utilities for E2E testing with a mock ledger.
//!
//! Provides a test fixture that creates an in-process server backed by a
//! controllable `MockLedger`, enabling end-to-end testing without a gateway.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use gumball_core::{
    testing::MockLedger, AdmissionPolicy, BatchOrchestrator, CallerIdentity, LedgerClient,
    LedgerQuery, MintService, OrchestratorConfig, PriceSchedule, StateSynchronizer,
};
use gumball_server::api::create_router;
use gumball_server::state::AppState;

pub const MACHINE_ID: &str = "machine-test";
pub const WALLET: &str = "wallet-test";

/// Test fixture for E2E testing with a mock ledger.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock ledger - inject rejections, delays and query failures
    pub ledger: Arc<MockLedger>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Configuration for the test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Connect a caller wallet
    pub wallet: bool,
    /// Balance for the wallet account
    pub balance: Decimal,
    /// Redeemed count on the machine
    pub redeemed: u64,
    /// Perform the startup refresh so the machine is ready
    pub initial_refresh: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            wallet: true,
            balance: "1.0".parse().unwrap(),
            redeemed: 50_000,
            initial_refresh: true,
        }
    }
}

impl TestConfig {
    pub fn without_wallet() -> Self {
        Self {
            wallet: false,
            ..Self::default()
        }
    }

    pub fn not_ready() -> Self {
        Self {
            initial_refresh: false,
            ..Self::default()
        }
    }

    pub fn with_balance(balance: &str) -> Self {
        Self {
            balance: balance.parse().unwrap(),
            ..Self::default()
        }
    }

    pub fn with_redeemed(redeemed: u64) -> Self {
        Self {
            redeemed,
            ..Self::default()
        }
    }
}

impl TestFixture {
    /// Create a test fixture with default configuration: a ready machine
    /// with 250k supply, 50k redeemed, and a funded wallet.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(config: TestConfig) -> Self {
        let ledger = Arc::new(MockLedger::new(MACHINE_ID, 250_000));
        ledger.set_redeemed(config.redeemed).await;

        let identity = if config.wallet {
            ledger.set_balance(WALLET, config.balance).await;
            Some(CallerIdentity::new(WALLET))
        } else {
            None
        };

        let synchronizer = Arc::new(StateSynchronizer::new(
            MACHINE_ID,
            Arc::clone(&ledger) as Arc<dyn LedgerQuery>,
        ));
        if config.initial_refresh {
            synchronizer
                .refresh(identity.as_ref())
                .await
                .expect("initial refresh failed");
        }

        let service = MintService::new(
            PriceSchedule::default(),
            AdmissionPolicy::default(),
            BatchOrchestrator::new(
                // Serialized submission keeps mock arrival order equal to
                // submission order, so injected rejections hit known indices.
                OrchestratorConfig {
                    max_in_flight: 1,
                    operation_timeout_secs: 5,
                },
                MACHINE_ID,
                Arc::clone(&ledger) as Arc<dyn LedgerClient>,
            ),
            Arc::clone(&synchronizer),
            identity,
        );

        let state = Arc::new(AppState::new(service, synchronizer));
        let router = create_router(state);

        Self { router, ledger }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
