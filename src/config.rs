//! Tool configuration: defaults, JSON config file, environment overrides
//!
//! Settings are resolved in three layers: built-in defaults, then an
//! optional JSON file, then environment variables. Environment always wins.

use crate::validate::{self, ConfigCheck};
use crate::types::ToolError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// The Stellar network a command runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Public,
}

impl Network {
    /// Default Horizon URL for this network
    pub fn horizon_url(self) -> &'static str {
        match self {
            Network::Testnet => "https://horizon-testnet.stellar.org",
            Network::Public => "https://horizon.stellar.org",
        }
    }

    /// Network passphrase used when signing for this network
    pub fn passphrase(self) -> &'static str {
        match self {
            Network::Testnet => "Test SDF Network ; September 2015",
            Network::Public => "Public Global Stellar Network ; September 2015",
        }
    }
}

impl FromStr for Network {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "public" => Ok(Network::Public),
            other => Err(ToolError::config(format!("invalid network: {}", other))),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Testnet => write!(f, "testnet"),
            Network::Public => write!(f, "public"),
        }
    }
}

/// Complete tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: Network,
    /// Overrides the network's default Horizon URL when set
    pub horizon_url: Option<String>,
    pub token_code: String,
    pub issuer_public_key: String,
    /// Secret seed of the issuer; used as the default sender for bulk runs
    pub issuer_secret_key: String,
    pub total_supply: String,
    pub base_fee: u32,
    pub timeout_secs: u64,
    pub batch_size: usize,
    pub rate_limit_delay_ms: u64,
    pub reports_dir: String,
    pub strict_validation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            horizon_url: None,
            token_code: "OGC".to_string(),
            issuer_public_key: String::new(),
            issuer_secret_key: String::new(),
            total_supply: "1000000000".to_string(),
            base_fee: 100,
            timeout_secs: 30,
            batch_size: 100,
            rate_limit_delay_ms: 500,
            reports_dir: "reports".to_string(),
            strict_validation: true,
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the config file if present, then
    /// environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ToolError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new("ogc_config.json");
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        let warnings = config.apply_vars(std::env::vars());
        for warning in warnings {
            tracing::warn!("{}", warning);
        }
        Ok(config)
    }

    /// Parse a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, ToolError> {
        if !path.exists() {
            return Err(ToolError::file_not_found(path));
        }
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| ToolError::config(format!("invalid config file: {}", e)))
    }

    /// Apply environment-style overrides, returning warnings for values
    /// that could not be parsed
    pub fn apply_vars<I>(&mut self, vars: I) -> Vec<String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut warnings = Vec::new();
        for (key, value) in vars {
            match key.as_str() {
                "STELLAR_NETWORK" => match value.parse() {
                    Ok(network) => self.network = network,
                    Err(_) => warnings.push(format!("ignoring invalid STELLAR_NETWORK: {}", value)),
                },
                "HORIZON_URL" => self.horizon_url = Some(value),
                "ISSUER_PUBLIC_KEY" => self.issuer_public_key = value,
                "ISSUER_SECRET_KEY" => self.issuer_secret_key = value,
                "TOKEN_CODE" => self.token_code = value,
                "TOTAL_SUPPLY" => self.total_supply = value,
                "BASE_FEE" => match value.parse() {
                    Ok(fee) => self.base_fee = fee,
                    Err(_) => warnings.push(format!("ignoring invalid BASE_FEE: {}", value)),
                },
                "TIMEOUT" => match value.parse() {
                    Ok(secs) => self.timeout_secs = secs,
                    Err(_) => warnings.push(format!("ignoring invalid TIMEOUT: {}", value)),
                },
                "BATCH_SIZE" => match value.parse() {
                    Ok(size) => self.batch_size = size,
                    Err(_) => warnings.push(format!("ignoring invalid BATCH_SIZE: {}", value)),
                },
                "RATE_LIMIT_DELAY" => match value.parse::<f64>() {
                    Ok(secs) if secs >= 0.0 => {
                        self.rate_limit_delay_ms = (secs * 1000.0) as u64;
                    }
                    _ => warnings.push(format!("ignoring invalid RATE_LIMIT_DELAY: {}", value)),
                },
                "STRICT_VALIDATION" => {
                    self.strict_validation = matches!(
                        value.to_lowercase().as_str(),
                        "1" | "true" | "yes" | "on"
                    );
                }
                "REPORTS_DIR" => self.reports_dir = value,
                _ => {}
            }
        }
        warnings
    }

    /// The Horizon URL in effect: explicit override or the network default
    pub fn horizon_url(&self) -> &str {
        self.horizon_url
            .as_deref()
            .unwrap_or_else(|| self.network.horizon_url())
    }

    /// HTTP request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pause between batch submissions
    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }

    /// Check this configuration for problems
    pub fn validate(&self) -> ConfigCheck {
        let mut check = validate::validate_network_config(
            &self.network.to_string(),
            self.horizon_url(),
        );
        if !self.issuer_public_key.is_empty() {
            let token = validate::validate_token_config(
                &self.token_code,
                &self.issuer_public_key,
                &self.total_supply,
            );
            check.errors.extend(token.errors);
            check.warnings.extend(token.warnings);
        } else {
            check
                .warnings
                .push("Issuer public key is not configured".to_string());
        }
        if !self.issuer_secret_key.is_empty()
            && !validate::is_valid_secret(&self.issuer_secret_key)
        {
            check
                .errors
                .push("Issuer secret key is malformed".to_string());
        }
        if self.batch_size == 0 {
            check.errors.push("Batch size must be positive".to_string());
        }
        check
    }

    /// Write a template config file with the default settings
    pub fn write_template(path: &Path) -> Result<(), ToolError> {
        let contents = serde_json::to_string_pretty(&Self::default())?;
        fs::write(path, contents + "\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Keypair;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[rstest]
    #[case::testnet("testnet", Network::Testnet)]
    #[case::public("public", Network::Public)]
    #[case::mixed_case("TestNet", Network::Testnet)]
    fn test_network_from_str(#[case] input: &str, #[case] expected: Network) {
        assert_eq!(input.parse::<Network>().unwrap(), expected);
    }

    #[test]
    fn test_network_from_str_rejects_unknown() {
        assert!("mainnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.horizon_url(), "https://horizon-testnet.stellar.org");
        assert_eq!(config.token_code, "OGC");
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.rate_limit_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_apply_vars_overrides() {
        let mut config = Config::default();
        let warnings = config.apply_vars(vars(&[
            ("STELLAR_NETWORK", "public"),
            ("TOKEN_CODE", "ABC"),
            ("BASE_FEE", "200"),
            ("RATE_LIMIT_DELAY", "1.5"),
            ("STRICT_VALIDATION", "false"),
            ("UNRELATED_VAR", "ignored"),
        ]));
        assert!(warnings.is_empty());
        assert_eq!(config.network, Network::Public);
        assert_eq!(config.horizon_url(), "https://horizon.stellar.org");
        assert_eq!(config.token_code, "ABC");
        assert_eq!(config.base_fee, 200);
        assert_eq!(config.rate_limit_delay(), Duration::from_millis(1500));
        assert!(!config.strict_validation);
    }

    #[rstest]
    #[case::bad_network("STELLAR_NETWORK", "mars")]
    #[case::bad_fee("BASE_FEE", "cheap")]
    #[case::bad_delay("RATE_LIMIT_DELAY", "-1")]
    #[case::bad_batch("BATCH_SIZE", "many")]
    fn test_apply_vars_warns_on_bad_values(#[case] key: &str, #[case] value: &str) {
        let mut config = Config::default();
        let warnings = config.apply_vars(vars(&[(key, value)]));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains(key));
    }

    #[test]
    fn test_horizon_url_override_wins() {
        let mut config = Config::default();
        config.apply_vars(vars(&[("HORIZON_URL", "http://localhost:8000")]));
        assert_eq!(config.horizon_url(), "http://localhost:8000");
    }

    #[test]
    fn test_from_file_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"network": "public", "token_code": "XYZ"}"#)
            .unwrap();
        file.flush().unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.network, Network::Public);
        assert_eq!(config.token_code, "XYZ");
        // Unspecified fields fall back to defaults
        assert_eq!(config.batch_size, 100);
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file(Path::new("/nonexistent/config.json"));
        assert!(matches!(result, Err(ToolError::FileNotFound { .. })));
    }

    #[test]
    fn test_write_template_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        Config::write_template(&path).unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.token_code, "OGC");
    }

    #[test]
    fn test_validate_flags_missing_issuer() {
        let check = Config::default().validate();
        assert!(check.is_valid());
        assert!(check
            .warnings
            .iter()
            .any(|w| w.contains("Issuer public key")));
    }

    #[test]
    fn test_validate_with_issuer() {
        let mut config = Config::default();
        config.issuer_public_key = Keypair::random().account_id();
        let check = config.validate();
        assert!(check.is_valid());
    }

    #[test]
    fn test_validate_rejects_malformed_secret() {
        let mut config = Config::default();
        config.issuer_secret_key = "not-a-seed".to_string();
        let check = config.validate();
        assert!(!check.is_valid());
        assert!(check.errors.iter().any(|e| e.contains("secret key")));
    }
}
