/*!
 * Provider implementations for the translation backends.
 *
 * This module contains client implementations for the supported backends:
 * - DeepSeek: LLM chat completions (OpenAI-compatible API)
 * - Google: public machine translation endpoint
 * - Mock: scripted backend for tests and benchmarks
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{BackendError, ProviderError};

/// One translation request, already encoded for the wire protocol
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Instructions for the translator; backends without an instruction channel ignore it
    pub system_directive: String,
    /// Slot-tagged lines to translate
    pub payload: String,
    /// Source language code (ISO 639-1 where possible)
    pub source_language: String,
    /// Target language code (ISO 639-1 where possible)
    pub target_language: String,
}

/// Raw text returned by a backend
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    /// The translated text
    pub text: String,
    /// Prompt tokens reported by the backend
    pub prompt_tokens: Option<u64>,
    /// Completion tokens reported by the backend
    pub completion_tokens: Option<u64>,
}

/// Common trait for all translation backends
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Human readable backend name for logs
    fn name(&self) -> &str;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<ProviderResponse, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;
}

/// Build the backend selected in the configuration
pub fn create_provider(config: &TranslationConfig) -> Result<Arc<dyn Provider>, BackendError> {
    config.check_credentials()?;

    let timeout_secs = config.get_timeout_secs();
    let provider: Arc<dyn Provider> = match config.provider {
        TranslationProvider::DeepSeek => Arc::new(
            deepseek::DeepSeek::new(config.get_api_key(), config.get_endpoint(), timeout_secs)
                .with_model(config.get_model())
                .with_temperature(config.common.temperature),
        ),
        TranslationProvider::Google => Arc::new(
            google::GoogleTranslate::new(config.get_endpoint(), timeout_secs),
        ),
    };

    Ok(provider)
}

pub mod deepseek;
pub mod google;
pub mod mock;
