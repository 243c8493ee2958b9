use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable holding the rate service API key.
pub const API_KEY_VAR: &str = "API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.currencyapi.com";

/// Largest accepted `decimals` value.
pub const MAX_DECIMALS: usize = 17;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_decimals() -> usize {
    6
}

fn default_fallback_currencies() -> Vec<String> {
    ["USD", "EUR", "RUB", "GBP"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    /// Shown by `currencies` when the live list cannot be fetched.
    #[serde(default = "default_fallback_currencies")]
    pub fallback_currencies: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            base_currency: default_base_currency(),
            decimals: default_decimals(),
            fallback_currencies: default_fallback_currencies(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or defaults if there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "coinconv", "coinconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.decimals > MAX_DECIMALS {
            bail!("decimals must be <= {MAX_DECIMALS}, got {}", self.decimals);
        }
        Ok(())
    }

    /// Resolves the API key, preferring the environment over the config file.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn api_key(&self) -> Result<String> {
        dotenvy::dotenv().ok();
        let from_env = std::env::var(API_KEY_VAR).ok();
        Self::select_api_key(from_env, self.provider.api_key.as_deref())
    }

    fn select_api_key(from_env: Option<String>, from_config: Option<&str>) -> Result<String> {
        from_env
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                from_config
                    .filter(|key| !key.trim().is_empty())
                    .map(str::to_string)
            })
            .with_context(|| {
                format!(
                    "{API_KEY_VAR} is not set. Export it, add it to a .env file, or set provider.api_key in the config file"
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/rates"
  api_key: "secret"
base_currency: "EUR"
decimals: 2
fallback_currencies: ["EUR", "CHF"]
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://example.com/rates");
        assert_eq!(config.provider.api_key.as_deref(), Some("secret"));
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.decimals, 2);
        assert_eq!(
            config.fallback_currencies,
            vec!["EUR".to_string(), "CHF".to_string()]
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.decimals, 6);
        assert_eq!(config.fallback_currencies, vec!["USD", "EUR", "RUB", "GBP"]);

        let partial: AppConfig =
            serde_yaml::from_str("decimals: 3").expect("Failed to deserialize");
        assert_eq!(partial.decimals, 3);
        assert_eq!(partial.provider.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("missing.yaml"));
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn test_load_rejects_out_of_range_decimals() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "decimals: 70000").unwrap();

        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
        assert!(
            err.chain()
                .any(|cause| cause.to_string() == "decimals must be <= 17, got 70000")
        );
    }

    #[test]
    fn test_load_accepts_max_decimals() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, format!("decimals: {MAX_DECIMALS}")).unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.decimals, MAX_DECIMALS);
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_select_api_key_precedence() {
        assert_eq!(
            AppConfig::select_api_key(Some("env".to_string()), Some("file")).unwrap(),
            "env"
        );
        assert_eq!(
            AppConfig::select_api_key(Some("  ".to_string()), Some("file")).unwrap(),
            "file"
        );
        assert_eq!(AppConfig::select_api_key(None, Some("file")).unwrap(), "file");

        let err = AppConfig::select_api_key(None, Some("")).unwrap_err();
        assert!(err.to_string().contains("API_KEY is not set"));
    }
}
