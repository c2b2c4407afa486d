use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("GUMBALL_").split("_"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_minimal() {
        let toml = r#"
[machine]
address = "3shPjsUctq2NmwLoswMidg46XX2SMFcaearGshYLtKYw"

[gateway]
url = "http://localhost:9900"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.gateway.url, "http://localhost:9900");
        assert_eq!(config.gateway.request_timeout_secs, 30);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.admission.min_quantity, 10);
        assert_eq!(config.pricing.tiers.len(), 2);
        assert!(config.wallet.is_none());
    }

    #[test]
    fn test_load_config_from_str_full() {
        let toml = r#"
[machine]
address = "machine-abc"

[gateway]
url = "https://gateway.example.com"
request_timeout_secs = 10

[server]
host = "127.0.0.1"
port = 3000

[[pricing.tiers]]
threshold = 0
unit_price = "0.005"

[[pricing.tiers]]
threshold = 100000
unit_price = "0.01"

[admission]
min_quantity = 5
max_quantity = 50

[orchestrator]
max_in_flight = 8
operation_timeout_secs = 45

[wallet]
address = "wallet-xyz"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.machine.address, "machine-abc");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.admission.max_quantity, 50);
        assert_eq!(config.orchestrator.max_in_flight, 8);
        assert_eq!(config.wallet.unwrap().address, "wallet-xyz");
    }

    #[test]
    fn test_load_config_from_str_missing_machine() {
        let toml = r#"
[gateway]
url = "http://localhost:9900"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[machine]
address = "machine-abc"

[gateway]
url = "http://localhost:9900"

[server]
host = "127.0.0.1"
port = 3000
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }
}
