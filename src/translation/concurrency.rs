/*!
 * Provider-specific dispatch tuning.
 *
 * This module provides batch size, concurrency and dispatch policy defaults
 * based on provider characteristics such as rate limits and output length limits.
 */

use serde::{Deserialize, Serialize};

use crate::app_config::TranslationProvider;

/// How batches are sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Fire batches concurrently (bounded) and wait for all of them to settle
    Concurrent,
    /// One batch at a time, for backends with strict rate limits
    Sequential,
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Concurrent => write!(f, "concurrent"),
            Self::Sequential => write!(f, "sequential"),
        }
    }
}

/// Provider-specific dispatch profile with tuned defaults
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Maximum concurrent requests
    pub max_concurrent_requests: usize,
    /// Recommended captions per batch for this provider
    pub recommended_batch_size: usize,
    /// Default dispatch policy
    pub dispatch_mode: DispatchMode,
}

impl ProviderProfile {
    /// Get the profile for a given provider
    pub fn for_provider(provider: TranslationProvider) -> Self {
        match provider {
            TranslationProvider::DeepSeek => Self {
                // Long context, but responses past ~4k tokens get truncated
                max_concurrent_requests: 4,
                recommended_batch_size: 50,
                dispatch_mode: DispatchMode::Concurrent,
            },
            TranslationProvider::Google => Self {
                // The public endpoint throttles bursts aggressively
                max_concurrent_requests: 1,
                recommended_batch_size: 20,
                dispatch_mode: DispatchMode::Sequential,
            },
        }
    }

    /// Get effective concurrent requests, respecting any user override
    pub fn effective_concurrent_requests(&self, user_override: Option<usize>) -> usize {
        user_override.filter(|n| *n > 0).unwrap_or(self.max_concurrent_requests)
    }
}
