//! Configuration for the evaluator

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CasefileError, Result};
use crate::llm::providers::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::oracle::OracleSettings;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "casefile.toml";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasefileConfig {
    /// API key for the judge model (prefer env vars)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Judge model name
    pub model: String,

    /// Chat completions base URL
    pub base_url: String,

    /// File-name glob selecting records inside the target directory
    pub pattern: String,

    /// Sampling temperature for the judge
    pub temperature: f32,

    /// Completion budget for the one-word answer
    pub max_tokens: usize,

    /// HTTP timeout per judge call
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Leave records that already have a verdict alone
    pub skip_scored: bool,
}

impl Default for CasefileConfig {
    fn default() -> Self {
        let oracle = OracleSettings::default();
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            pattern: "*.json".to_string(),
            temperature: oracle.temperature,
            max_tokens: oracle.max_tokens,
            request_timeout: Duration::from_secs(60),
            skip_scored: false,
        }
    }
}

/// Values given explicitly (command line); applied after every other source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub pattern: Option<String>,
    pub skip_scored: bool,
}

impl CasefileConfig {
    /// Load configuration from defaults, files, and environment variables.
    ///
    /// Loads in this order, later sources winning:
    /// 1. Default configuration
    /// 2. `casefile.toml` in the working directory
    /// 3. File named by `CASEFILE_CONFIG_PATH`, which must exist when set
    /// 4. `CASEFILE_*` environment variables
    ///
    /// The API key falls back to `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is invalid.
    pub fn load() -> Result<Self> {
        Self::load_with(&ConfigOverrides::default())
    }

    /// [`load`](Self::load), then an explicit config file, then overrides.
    pub fn load_with(overrides: &ConfigOverrides) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(CasefileConfig::default()))
            .merge(Toml::file(DEFAULT_CONFIG_FILE));

        let env_path = std::env::var_os("CASEFILE_CONFIG_PATH")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        for path in env_path.iter().chain(&overrides.config_path) {
            if !path.exists() {
                return Err(CasefileError::Configuration(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("CASEFILE_").ignore(&["config_path"]));

        let mut config: CasefileConfig = figment.extract().map_err(|e| {
            CasefileError::Configuration(format!("Failed to load configuration: {}", e))
        })?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.is_empty());
        }
        config.apply_overrides(overrides);

        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(api_key) = &overrides.api_key {
            self.api_key = Some(api_key.clone());
        }
        if let Some(model) = &overrides.model {
            self.model = model.clone();
        }
        if let Some(base_url) = &overrides.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(pattern) = &overrides.pattern {
            self.pattern = pattern.clone();
        }
        if overrides.skip_scored {
            self.skip_scored = true;
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(CasefileError::Configuration("model must not be empty".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(CasefileError::Configuration("base_url must not be empty".to_string()));
        }
        if self.pattern.trim().is_empty() {
            return Err(CasefileError::Configuration("pattern must not be empty".to_string()));
        }
        if self.max_tokens == 0 {
            return Err(CasefileError::Configuration(
                "max_tokens must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The API key, or an error telling the user where to put one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                CasefileError::Configuration(
                    "OpenAI API key required. Set OPENAI_API_KEY environment variable or use --api-key"
                        .to_string(),
                )
            })
    }

    pub fn oracle_settings(&self) -> OracleSettings {
        OracleSettings {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
