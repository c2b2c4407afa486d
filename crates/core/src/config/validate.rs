use rust_decimal::Decimal;
use thiserror::Error;

use super::types::Config;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.machine.address.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "machine.address must not be empty".to_string(),
        ));
    }

    if !config.gateway.url.starts_with("http://") && !config.gateway.url.starts_with("https://") {
        return Err(ConfigError::Invalid(format!(
            "gateway.url must be an http(s) URL, got '{}'",
            config.gateway.url
        )));
    }

    if config.gateway.request_timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "gateway.request_timeout_secs must be at least 1".to_string(),
        ));
    }

    validate_tiers(config)?;

    if config.admission.min_quantity == 0 {
        return Err(ConfigError::Invalid(
            "admission.min_quantity must be at least 1".to_string(),
        ));
    }
    if config.admission.min_quantity > config.admission.max_quantity {
        return Err(ConfigError::Invalid(format!(
            "admission.min_quantity ({}) exceeds max_quantity ({})",
            config.admission.min_quantity, config.admission.max_quantity
        )));
    }

    if config.orchestrator.operation_timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "orchestrator.operation_timeout_secs must be at least 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_tiers(config: &Config) -> Result<(), ConfigError> {
    let tiers = &config.pricing.tiers;
    if tiers.is_empty() {
        return Err(ConfigError::Invalid(
            "pricing.tiers must not be empty".to_string(),
        ));
    }
    if tiers[0].threshold != 0 {
        return Err(ConfigError::Invalid(
            "the first pricing tier must start at threshold 0".to_string(),
        ));
    }
    for window in tiers.windows(2) {
        if window[1].threshold <= window[0].threshold {
            return Err(ConfigError::Invalid(format!(
                "pricing.tiers thresholds must be strictly ascending ({} then {})",
                window[0].threshold, window[1].threshold
            )));
        }
    }
    for tier in tiers {
        if tier.unit_price <= Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "tier at threshold {} has non-positive unit price {}",
                tier.threshold, tier.unit_price
            )));
        }
    }
    Ok(())
}
