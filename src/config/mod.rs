//! Configuration loading
//!
//! The gateway reads its configuration once at start-up into a
//! [`GatewayConfig`] value which is then handed by reference to the
//! components that need it. Business logic never looks configuration up on
//! its own.
//!
//! ```yaml
//! acquiring_bank:
//!   api_url: "https://bank.example.com/payments"
//!   api_key: "secret"
//!   test_mode: false
//! ```

use crate::types::GatewayError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the acquiring bank client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankConfig {
    /// Endpoint receiving payment submissions (live mode only)
    #[serde(default)]
    pub api_url: String,

    /// Key sent along with every live submission
    #[serde(default)]
    pub api_key: String,

    /// Use the deterministic mock instead of calling the bank
    #[serde(default = "default_test_mode")]
    pub test_mode: bool,
}

fn default_test_mode() -> bool {
    true
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            test_mode: default_test_mode(),
        }
    }
}

/// Complete gateway configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub acquiring_bank: BankConfig,
}

impl GatewayConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, GatewayError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, GatewayError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that a live configuration names an endpoint
    pub fn validate(&self) -> Result<(), GatewayError> {
        if !self.acquiring_bank.test_mode && self.acquiring_bank.api_url.trim().is_empty() {
            return Err(GatewayError::config(
                "acquiring_bank.api_url is required when test_mode is false",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_uses_mock_bank() {
        let config = GatewayConfig::default();
        assert!(config.acquiring_bank.test_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_live_config_from_yaml() {
        let yaml = "acquiring_bank:\n  api_url: https://bank.example.com/pay\n  api_key: k3y\n  test_mode: false\n";
        let config = GatewayConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.acquiring_bank.api_url, "https://bank.example.com/pay");
        assert_eq!(config.acquiring_bank.api_key, "k3y");
        assert!(!config.acquiring_bank.test_mode);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config = GatewayConfig::from_yaml_str("acquiring_bank:\n  api_key: abc\n").unwrap();
        assert!(config.acquiring_bank.test_mode);
        assert_eq!(config.acquiring_bank.api_key, "abc");

        let empty = GatewayConfig::from_yaml_str("{}").unwrap();
        assert_eq!(empty, GatewayConfig::default());
    }

    #[test]
    fn test_live_mode_requires_endpoint() {
        let result = GatewayConfig::from_yaml_str("acquiring_bank:\n  test_mode: false\n");
        assert!(matches!(result, Err(GatewayError::Config { .. })));
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let result = GatewayConfig::from_yaml_str("acquiring_bank: [not, a, map]");
        assert!(matches!(result, Err(GatewayError::Config { .. })));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"acquiring_bank:\n  test_mode: true\n").unwrap();
        file.flush().unwrap();

        let config = GatewayConfig::from_yaml_file(file.path()).unwrap();
        assert!(config.acquiring_bank.test_mode);
    }

    #[test]
    fn test_from_missing_file() {
        let result = GatewayConfig::from_yaml_file(Path::new("does/not/exist.yaml"));
        let error = result.unwrap_err();
        assert!(error.to_string().contains("Failed to read config file"));
    }
}
