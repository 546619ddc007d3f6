use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use url::Url;

use crate::errors::BackendError;
use crate::translation::concurrency::{DispatchMode, ProviderProfile};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: DeepSeek chat completions (LLM)
    #[default]
    DeepSeek,
    // @provider: Google public machine translation endpoint
    Google,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::DeepSeek => "DeepSeek",
            Self::Google => "Google Translate",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::DeepSeek => "deepseek".to_string(),
            Self::Google => "google".to_string(),
        }
    }

    // @returns: Whether an API key must be configured
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::DeepSeek)
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deepseek" => Ok(Self::DeepSeek),
            "google" => Ok(Self::Google),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Captions per request, backend default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,

    // @field: Max concurrent requests (0 = backend default)
    #[serde(default)]
    pub concurrent_requests: usize,

    // @field: Timeout seconds for one batch request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Dispatch policy, backend default when absent
    #[serde(default)]
    pub dispatch_mode: Option<DispatchMode>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        let profile = ProviderProfile::for_provider(provider_type);
        match provider_type {
            TranslationProvider::DeepSeek => Self {
                provider_type: "deepseek".to_string(),
                model: default_deepseek_model(),
                api_key: String::new(),
                endpoint: default_deepseek_endpoint(),
                batch_size: Some(profile.recommended_batch_size),
                concurrent_requests: profile.max_concurrent_requests,
                timeout_secs: default_timeout_secs(),
                dispatch_mode: Some(profile.dispatch_mode),
            },
            TranslationProvider::Google => Self {
                provider_type: "google".to_string(),
                model: String::new(),
                api_key: String::new(),
                endpoint: default_google_endpoint(),
                batch_size: Some(profile.recommended_batch_size),
                concurrent_requests: profile.max_concurrent_requests,
                timeout_secs: default_timeout_secs(),
                dispatch_mode: Some(profile.dispatch_mode),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Retry count for failed batch requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values keep the tagged line format more reliably
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    1
}

fn default_retry_backoff_ms() -> u64 {
    500 // doubled on each retry
}

fn default_temperature() -> f32 {
    0.1
}

fn default_deepseek_endpoint() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_deepseek_model() -> String {
    "deepseek-chat".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        self.translation.check_credentials()?;

        let configured_batch_size = self.translation.get_active_provider_config().and_then(|p| p.batch_size);
        if configured_batch_size == Some(0) {
            return Err(anyhow!("Batch size must be at least 1"));
        }

        let endpoint = self.translation.get_endpoint();
        Url::parse(&endpoint)
            .map_err(|e| anyhow!("Invalid endpoint '{}': {}", endpoint, e))?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "zh".to_string(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Fail when the active backend needs a credential and has none
    pub fn check_credentials(&self) -> Result<(), BackendError> {
        if self.provider.requires_api_key() && self.get_api_key().trim().is_empty() {
            return Err(BackendError::MissingCredential {
                provider: self.provider.display_name().to_string(),
            });
        }
        Ok(())
    }

    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Mutable access to the active provider configuration, inserting defaults if absent
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let position = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(position) => position,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[position]
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    fn profile(&self) -> ProviderProfile {
        ProviderProfile::for_provider(self.provider)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::DeepSeek => default_deepseek_model(),
            TranslationProvider::Google => String::new(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::DeepSeek => default_deepseek_endpoint(),
            TranslationProvider::Google => default_google_endpoint(),
        }
    }

    /// Captions per batch for the active provider
    pub fn get_batch_size(&self) -> usize {
        self.get_active_provider_config()
            .and_then(|p| p.batch_size)
            .unwrap_or_else(|| self.profile().recommended_batch_size)
    }

    /// Maximum batches in flight for the active provider
    pub fn get_concurrent_requests(&self) -> usize {
        self.profile().effective_concurrent_requests(
            self.get_active_provider_config().map(|p| p.concurrent_requests)
        )
    }

    /// Per-batch request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Dispatch policy for the active provider
    pub fn get_dispatch_mode(&self) -> DispatchMode {
        self.get_active_provider_config()
            .and_then(|p| p.dispatch_mode)
            .unwrap_or_else(|| self.profile().dispatch_mode)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::DeepSeek),
                ProviderConfig::new(TranslationProvider::Google),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
