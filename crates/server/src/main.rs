use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gumball_core::{
    load_config, validate_config, BatchOrchestrator, CallerIdentity, LedgerClient, LedgerQuery,
    MintService, PriceSchedule, RpcLedgerClient, StateSynchronizer,
};

use gumball_server::api::create_router;
use gumball_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("GUMBALL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Issuance machine: {}", config.machine.address);
    info!("Mint gateway: {}", config.gateway.url);

    // Create gateway client; it serves as both the submission and the query
    // side of the ledger.
    let gateway = Arc::new(
        RpcLedgerClient::new(config.gateway.clone()).context("Failed to create gateway client")?,
    );

    let identity = config
        .wallet
        .as_ref()
        .map(|wallet| CallerIdentity::new(wallet.address.clone()));
    match &identity {
        Some(identity) => info!("Caller wallet: {}", identity.address),
        None => info!("No caller wallet configured; minting disabled"),
    }

    // Create state synchronizer and load the initial snapshot. A failed
    // initial refresh is not fatal: the machine stays not-ready and the next
    // manual refresh may succeed.
    let synchronizer = Arc::new(StateSynchronizer::new(
        config.machine.address.clone(),
        Arc::clone(&gateway) as Arc<dyn LedgerQuery>,
    ));
    if let Err(e) = synchronizer.refresh(identity.as_ref()).await {
        warn!("Initial state refresh failed: {}", e);
    }

    // Create the mint service
    let service = MintService::new(
        PriceSchedule::new(config.pricing.tiers.clone()),
        config.admission.clone(),
        BatchOrchestrator::new(
            config.orchestrator.clone(),
            config.machine.address.clone(),
            Arc::clone(&gateway) as Arc<dyn LedgerClient>,
        ),
        Arc::clone(&synchronizer),
        identity,
    );

    // Create app state and router
    let state = Arc::new(AppState::new(service, synchronizer));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
