/*!
 * Mock provider implementation for testing.
 *
 * This module provides a mock backend that simulates different translator behaviors:
 * - `MockProvider::working()` - Always answers every tagged line
 * - `MockProvider::shuffled()` - Answers every line but in random order
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::empty()` - Returns an empty body
 */

use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::{Provider, ProviderRequest, ProviderResponse};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Echoes every tagged line with a `[target]` prefix on the text
    Working,
    /// Like `Working`, but the response lines come back in random order
    Shuffled,
    /// Answers only every other slot
    DropsOddSlots,
    /// Fails every Nth request (1-based), succeeds otherwise
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty response
    Empty,
    /// Simulates a slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Payloads received, in arrival order
    received: Arc<Mutex<Vec<String>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&ProviderRequest) -> Result<String, ProviderError>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that answers in random line order
    pub fn shuffled() -> Self {
        Self::new(MockBehavior::Shuffled)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that waits before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator, used instead of the behavior
    pub fn with_custom_response(mut self, generator: fn(&ProviderRequest) -> Result<String, ProviderError>) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Payloads received so far, in arrival order
    pub fn received_payloads(&self) -> Vec<String> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Answer every tagged line of `payload`, marking the text with the target language
    pub fn echo_tagged_lines(payload: &str, target_language: &str) -> Vec<String> {
        payload
            .lines()
            .filter_map(|line| line.split_once('|'))
            .map(|(slot, text)| format!("{}|[{}] {}", slot, target_language, text))
            .collect()
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            received: Arc::clone(&self.received),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut received) = self.received.lock() {
            received.push(request.payload.clone());
        }

        let text = if let Some(generator) = self.custom_response {
            generator(&request)?
        } else {
            match self.behavior {
                MockBehavior::Working => {
                    Self::echo_tagged_lines(&request.payload, &request.target_language).join("\n")
                }

                MockBehavior::Shuffled => {
                    let mut lines = Self::echo_tagged_lines(&request.payload, &request.target_language);
                    lines.shuffle(&mut rand::rng());
                    lines.join("\n")
                }

                MockBehavior::DropsOddSlots => {
                    Self::echo_tagged_lines(&request.payload, &request.target_language)
                        .into_iter()
                        .step_by(2)
                        .collect::<Vec<_>>()
                        .join("\n")
                }

                MockBehavior::Intermittent { fail_every } => {
                    if fail_every > 0 && count % fail_every == fail_every - 1 {
                        return Err(ProviderError::ApiError {
                            message: format!("Simulated intermittent failure (request #{})", count + 1),
                            status_code: 503,
                        });
                    }
                    Self::echo_tagged_lines(&request.payload, &request.target_language).join("\n")
                }

                MockBehavior::Failing => {
                    return Err(ProviderError::ApiError {
                        message: "Simulated provider failure".to_string(),
                        status_code: 500,
                    });
                }

                MockBehavior::Empty => String::new(),

                MockBehavior::Slow { delay_ms } => {
                    tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                    Self::echo_tagged_lines(&request.payload, &request.target_language).join("\n")
                }
            }
        };

        Ok(ProviderResponse {
            prompt_tokens: Some(request.payload.len() as u64),
            completion_tokens: Some(text.len() as u64),
            text,
        })
    }
}
