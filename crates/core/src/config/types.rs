use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::admission::AdmissionPolicy;
use crate::orchestrator::OrchestratorConfig;
use crate::pricing::PriceTier;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// The issuance machine to operate against.
    pub machine: MachineConfig,
    /// The mint gateway backing submission and queries.
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub admission: AdmissionPolicy,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// Caller wallet; absent means no caller is connected.
    #[serde(default)]
    pub wallet: Option<WalletConfig>,
}

/// Issuance machine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MachineConfig {
    /// Ledger address of the issuance machine.
    pub address: String,
}

/// Mint gateway configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Gateway base URL (e.g., "https://gateway.example.com").
    pub url: String,
    /// Request timeout in seconds for queries (default: 30).
    /// Submissions use the orchestrator's per-operation timeout instead.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Pricing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    /// Price tiers, ascending by threshold; the first must start at 0.
    pub tiers: Vec<PriceTier>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tiers: crate::pricing::PriceSchedule::default().tiers().to_vec(),
        }
    }
}

/// Caller wallet configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalletConfig {
    /// Ledger address of the caller's wallet. Signing happens in the
    /// gateway; only the address lives here.
    pub address: String,
}
