/*!
 * Core translation service implementation.
 *
 * This module contains the `TranslationService`, which translates one batch
 * at a time through the configured backend. A batch call never fails: any
 * transport error, timeout or unusable body degrades to a result where every
 * slot is marked as failed.
 */

use anyhow::Result;
use log::{debug, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::TranslationConfig;
use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{self, Provider, ProviderRequest, ProviderResponse};
use crate::subtitle_processor::Batch;

use super::protocol::{self, PROTOCOL_VERSION};
use super::result::TranslationResult;

/// Upper bound on the wait between two attempts
pub const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(60);

/// Token usage statistics for tracking API consumption
#[derive(Clone, Debug)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Total number of tokens
    pub total_tokens: u64,

    /// Start time of token tracking
    pub start_time: Instant,

    /// Total time spent on API requests
    pub api_duration: Duration,

    /// Provider name
    pub provider: String,

    /// Model name
    pub model: String,
}

impl Default for TokenUsageStats {
    fn default() -> Self {
        Self::with_provider_info(String::new(), String::new())
    }
}

impl TokenUsageStats {
    /// Create new token usage stats with provider info
    pub fn with_provider_info(provider: String, model: String) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            start_time: Instant::now(),
            api_duration: Duration::from_secs(0),
            provider,
            model,
        }
    }

    /// Add token usage numbers
    pub fn add_token_usage(&mut self, prompt_tokens: Option<u64>, completion_tokens: Option<u64>) {
        if let Some(pt) = prompt_tokens {
            self.prompt_tokens += pt;
            self.total_tokens += pt;
        }

        if let Some(ct) = completion_tokens {
            self.completion_tokens += ct;
            self.total_tokens += ct;
        }
    }

    /// Fold the usage of one batch into these stats
    pub fn merge(&mut self, usage: &BatchUsage) {
        self.add_token_usage(usage.prompt_tokens, usage.completion_tokens);
        self.api_duration += usage.duration;
    }

    /// Calculate tokens per minute rate
    pub fn tokens_per_minute(&self) -> f64 {
        let duration_minutes = if self.api_duration.as_secs_f64() > 0.0 {
            self.api_duration.as_secs_f64() / 60.0
        } else {
            self.start_time.elapsed().as_secs_f64() / 60.0
        };

        if duration_minutes > 0.0 {
            self.total_tokens as f64 / duration_minutes
        } else {
            0.0
        }
    }

    /// Generate a summary of token usage
    pub fn summary(&self) -> String {
        let elapsed_minutes = self.start_time.elapsed().as_secs_f64() / 60.0;
        let api_minutes = self.api_duration.as_secs_f64() / 60.0;

        format!(
            "Token Usage Summary:\n\
             Provider: {}\n\
             Model: {}\n\
             Prompt tokens: {}\n\
             Completion tokens: {}\n\
             Total tokens: {}\n\
             Elapsed time: {:.2} minutes\n\
             API request time: {:.2} minutes\n\
             Tokens per minute: {:.2}",
            self.provider,
            self.model,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens,
            elapsed_minutes,
            api_minutes,
            self.tokens_per_minute()
        )
    }
}

/// Usage reported for one batch
#[derive(Clone, Debug, Default)]
pub struct BatchUsage {
    /// Prompt tokens, if the backend reports them
    pub prompt_tokens: Option<u64>,
    /// Completion tokens, if the backend reports them
    pub completion_tokens: Option<u64>,
    /// Wall time spent in backend calls, retries included
    pub duration: Duration,
}

/// Translation options for customizing the translation process
#[derive(Clone, Debug)]
pub struct TranslationOptions {
    /// Timeout applied to each backend call
    pub request_timeout: Duration,

    /// Extra attempts after a failed call
    pub retry_count: u32,

    /// Base backoff between attempts, doubled each time
    pub retry_backoff: Duration,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            retry_count: 1,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl TranslationOptions {
    /// Options taken from the translation configuration
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.get_timeout_secs()),
            retry_count: config.common.retry_count,
            retry_backoff: Duration::from_millis(config.common.retry_backoff_ms),
        }
    }

    /// Wait before the retry that follows failed attempt `attempt` (0-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff
            .checked_mul(2u32.saturating_pow(attempt))
            .unwrap_or(MAX_RETRY_BACKOFF)
            .min(MAX_RETRY_BACKOFF)
    }
}

/// Translation service for slot-tagged batches
#[derive(Clone, Debug)]
pub struct TranslationService {
    /// Backend used for every batch
    provider: Arc<dyn Provider>,

    /// Model name reported in usage statistics
    model: String,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,

    /// Directive source language name
    source_language_name: String,

    /// Directive target language name
    target_language_name: String,

    /// Translation options
    pub options: TranslationOptions,
}

impl TranslationService {
    /// Create a translation service for the backend selected in `config`
    pub fn new(config: &TranslationConfig, source_language: &str, target_language: &str) -> Result<Self> {
        let provider = providers::create_provider(config)?;
        let mut service = Self::with_provider(provider, source_language, target_language)
            .with_options(TranslationOptions::from_config(config));
        service.model = config.get_model();
        Ok(service)
    }

    /// Create a translation service around an existing provider
    pub fn with_provider(provider: Arc<dyn Provider>, source_language: &str, target_language: &str) -> Self {
        let language_name = |code: &str| {
            language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string())
        };
        let language_code = |code: &str| {
            language_utils::normalize_to_part1_or_part2t(code).unwrap_or_else(|_| code.to_string())
        };

        Self {
            provider,
            model: String::new(),
            source_language: language_code(source_language),
            target_language: language_code(target_language),
            source_language_name: language_name(source_language),
            target_language_name: language_name(target_language),
            options: TranslationOptions::default(),
        }
    }

    /// Replace the translation options
    pub fn with_options(mut self, options: TranslationOptions) -> Self {
        self.options = options;
        self
    }

    /// Name of the backend in use
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Model name in use, empty when the backend has none
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Fresh usage statistics labelled with this service's backend
    pub fn new_usage_stats(&self) -> TokenUsageStats {
        TokenUsageStats::with_provider_info(self.provider.name().to_string(), self.model.clone())
    }

    /// Build the backend request for a batch
    pub fn build_request(&self, batch: &Batch) -> ProviderRequest {
        ProviderRequest {
            system_directive: protocol::system_directive(
                &self.source_language_name,
                &self.target_language_name,
                batch.len(),
            ),
            payload: protocol::encode_batch(batch),
            source_language: self.source_language.clone(),
            target_language: self.target_language.clone(),
        }
    }

    /// Translate one batch.
    ///
    /// The result always has exactly `batch.len()` slots. Slots the translator
    /// did not answer, and every slot of a batch whose call failed, are marked
    /// as failed.
    pub async fn translate_batch(&self, batch: &Batch) -> (TranslationResult, BatchUsage) {
        if batch.is_empty() {
            return (TranslationResult::all_failed(0), BatchUsage::default());
        }

        let request = self.build_request(batch);
        debug!(
            "Batch {}: sending {} lines to {} (protocol {})",
            batch.index + 1, batch.len(), self.provider.name(), PROTOCOL_VERSION
        );

        let start = Instant::now();
        let outcome = self.complete_with_retry(request, batch.index).await;
        let duration = start.elapsed();

        match outcome {
            Ok(response) => {
                let result = protocol::decode_response(&response.text, batch.len());
                let failed = result.failed_count();
                if failed > 0 {
                    warn!(
                        "Batch {}: {} of {} lines came back without a usable translation",
                        batch.index + 1, failed, batch.len()
                    );
                }
                let usage = BatchUsage {
                    prompt_tokens: response.prompt_tokens,
                    completion_tokens: response.completion_tokens,
                    duration,
                };
                (result, usage)
            }
            Err(e) => {
                warn!("Batch {}: translation unavailable for {} lines: {}", batch.index + 1, batch.len(), e);
                (TranslationResult::all_failed(batch.len()), BatchUsage { duration, ..Default::default() })
            }
        }
    }

    /// Call the backend with a per-attempt timeout and bounded retries
    async fn complete_with_retry(&self, request: ProviderRequest, batch_index: usize) -> Result<ProviderResponse, ProviderError> {
        let mut attempt = 0;

        loop {
            let error = match tokio::time::timeout(
                self.options.request_timeout,
                self.provider.complete(request.clone()),
            ).await {
                Ok(Ok(response)) if !response.text.trim().is_empty() => return Ok(response),
                Ok(Ok(_)) => ProviderError::ParseError("empty response".to_string()),
                Ok(Err(e)) => e,
                Err(_) => ProviderError::Timeout(self.options.request_timeout.as_secs()),
            };

            if attempt >= self.options.retry_count || !error.is_retryable() {
                return Err(error);
            }

            let backoff = self.options.backoff_for(attempt);
            debug!(
                "Batch {}: attempt {} failed ({}), retrying in {:?}",
                batch_index + 1, attempt + 1, error, backoff
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}
