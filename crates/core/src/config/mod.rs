//! Service configuration.
//!
//! TOML file with `GUMBALL_`-prefixed environment variable overrides.

mod loader;
mod types;
mod validate;

pub use loader::{load_config, load_config_from_str};
pub use types::{Config, GatewayConfig, MachineConfig, PricingConfig, ServerConfig, WalletConfig};
pub use validate::{validate_config, ConfigError};
