//! Configuration management for the qualcode CLI.
//!
//! Configuration is merged from three sources, lowest precedence first:
//! an optional YAML config file, environment variables, and command-line
//! flags. Provider credentials (Azure OpenAI) come exclusively from the
//! environment and are validated before any chunk is sent.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default Azure OpenAI API version when `AZURE_OPENAI_API_VERSION` is unset.
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-02-15-preview";

/// Main application configuration.
///
/// This struct holds all global options that affect CLI behavior across
/// commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider (e.g., "azure", "ollama")
    pub provider: String,

    /// Model identifier. For Azure this is the deployment name and is
    /// normally taken from `AZURE_OPENAI_DEPLOYMENT`.
    pub model: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    provider: Option<String>,
    model: Option<String>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "azure".to_string(),
            model: String::new(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `QUALCODE_CONFIG`: Path to config file
    /// - `QUALCODE_PROVIDER`: LLM provider ("azure", "ollama")
    /// - `QUALCODE_MODEL`: Model identifier
    /// - `AZURE_OPENAI_DEPLOYMENT`: Default model when provider is "azure"
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("QUALCODE_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        if let Some(path) = config.config_file.clone() {
            if path.exists() {
                config = config.merge_yaml(&path)?;
            }
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("QUALCODE_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("QUALCODE_MODEL") {
            config.model = model;
        } else if config.model.is_empty() {
            // For Azure the deployment name doubles as the model identifier
            if let Ok(deployment) = std::env::var("AZURE_OPENAI_DEPLOYMENT") {
                config.model = deployment;
            }
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(provider) = config_file.provider {
            result.provider = provider;
        }

        if let Some(model) = config_file.model {
            result.model = model;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the
    /// config file.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }
}

/// Azure OpenAI connection settings, resolved from the environment.
///
/// All three required variables are checked together so a user with
/// multiple missing variables sees them all in one error message.
#[derive(Debug, Clone)]
pub struct AzureConfig {
    /// Full https endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,

    /// API key for the `api-key` header
    pub api_key: String,

    /// Deployment name (path segment of the completions URL)
    pub deployment: String,

    /// API version query parameter
    pub api_version: String,
}

impl AzureConfig {
    /// Resolve Azure OpenAI settings from the environment.
    ///
    /// Required: `AZURE_OPENAI_API_KEY`, `AZURE_OPENAI_ENDPOINT`,
    /// `AZURE_OPENAI_DEPLOYMENT`. Optional: `AZURE_OPENAI_API_VERSION`.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve Azure OpenAI settings through an arbitrary variable lookup.
    ///
    /// Validation lives here so tests can exercise it without touching
    /// process-wide environment state.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let mut missing = Vec::new();
        let mut cleaned = std::collections::HashMap::new();

        for var in [
            "AZURE_OPENAI_API_KEY",
            "AZURE_OPENAI_ENDPOINT",
            "AZURE_OPENAI_DEPLOYMENT",
        ] {
            let raw = lookup(var).unwrap_or_default();
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                missing.push(var);
            } else {
                cleaned.insert(var, trimmed.to_string());
            }
        }

        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "Missing Azure OpenAI environment variables: {}",
                missing.join(", ")
            )));
        }

        let endpoint = cleaned["AZURE_OPENAI_ENDPOINT"]
            .trim_end_matches('/')
            .to_string();
        if !endpoint.starts_with("https://") {
            return Err(AppError::Config(
                "AZURE_OPENAI_ENDPOINT must include the full https URL, e.g. \
                 https://my-resource.openai.azure.com"
                    .to_string(),
            ));
        }

        let api_version = lookup("AZURE_OPENAI_API_VERSION")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string());

        Ok(Self {
            endpoint,
            api_key: cleaned["AZURE_OPENAI_API_KEY"].clone(),
            deployment: cleaned["AZURE_OPENAI_DEPLOYMENT"].clone(),
            api_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "azure");
        assert!(!config.verbose);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(
            None,
            Some("ollama".to_string()),
            Some("llama3.2".to_string()),
            None,
            true,
            true,
        );

        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.2");
        assert!(config.verbose);
        assert!(config.no_color);
        // Verbose implies debug logging when no explicit level is set
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_merge_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "provider: ollama\nmodel: llama3.2\nlogging:\n  level: warn\n  color: false\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        let merged = config.merge_yaml(&path).unwrap();

        assert_eq!(merged.provider, "ollama");
        assert_eq!(merged.model, "llama3.2");
        assert_eq!(merged.log_level.as_deref(), Some("warn"));
        assert!(merged.no_color);
    }

    fn azure_vars(endpoint: &str) -> std::collections::HashMap<&'static str, String> {
        std::collections::HashMap::from([
            ("AZURE_OPENAI_API_KEY", "secret".to_string()),
            ("AZURE_OPENAI_ENDPOINT", endpoint.to_string()),
            ("AZURE_OPENAI_DEPLOYMENT", "gpt-4o".to_string()),
        ])
    }

    #[test]
    fn test_azure_config_resolves() {
        let vars = azure_vars("https://my-resource.openai.azure.com/");
        let config = AzureConfig::from_lookup(|var| vars.get(var).cloned()).unwrap();

        assert_eq!(config.endpoint, "https://my-resource.openai.azure.com");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.deployment, "gpt-4o");
        assert_eq!(config.api_version, DEFAULT_AZURE_API_VERSION);
    }

    #[test]
    fn test_azure_config_error_names_every_missing_variable() {
        // Key is set, endpoint is blank, deployment is absent entirely;
        // both missing variables must appear in the one error message
        let vars = std::collections::HashMap::from([
            ("AZURE_OPENAI_API_KEY", "secret".to_string()),
            ("AZURE_OPENAI_ENDPOINT", "   ".to_string()),
        ]);

        let err = AzureConfig::from_lookup(|var| vars.get(var).cloned()).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("AZURE_OPENAI_ENDPOINT"), "{}", message);
        assert!(message.contains("AZURE_OPENAI_DEPLOYMENT"), "{}", message);
        assert!(!message.contains("AZURE_OPENAI_API_KEY"), "{}", message);
    }

    #[test]
    fn test_azure_config_rejects_non_https_endpoint() {
        let vars = azure_vars("http://my-resource.openai.azure.com");

        let err = AzureConfig::from_lookup(|var| vars.get(var).cloned()).unwrap_err();
        assert!(err.to_string().contains("https"), "{}", err);
    }
}
