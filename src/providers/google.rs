use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use log::error;

use crate::errors::ProviderError;
use crate::language_utils;
use super::{Provider, ProviderRequest, ProviderResponse};

/// Client for the public Google Translate endpoint
///
/// Machine translation has no instruction channel, so the system directive of a
/// request is dropped and only the slot-tagged payload is sent.
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the service
    endpoint: String,
}

impl GoogleTranslate {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/translate_a/single", self.endpoint.trim_end_matches('/'))
    }

    /// Translate `text`, returning the concatenated translated segments
    pub async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String, ProviderError> {
        let source = language_utils::to_google_code(source_language);
        let target = language_utils::to_google_code(target_language);

        let response = self.client.post(self.api_url())
            .query(&[
                ("client", "gtx"),
                ("sl", source.as_str()),
                ("tl", target.as_str()),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google Translate error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let body: Value = response.json().await
            .map_err(|e| ProviderError::ParseError(format!("Google Translate response: {}", e)))?;

        Self::extract_text(&body)
            .ok_or_else(|| ProviderError::ParseError("Unexpected Google Translate response shape".to_string()))
    }

    /// Concatenate the translated segments of a `translate_a/single` response
    ///
    /// The body looks like `[[["translated", "original", ...], ...], ...]`.
    pub fn extract_text(body: &Value) -> Option<String> {
        let segments = body.get(0)?.as_array()?;
        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();
        Some(text)
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    fn name(&self) -> &str {
        "Google Translate"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let text = self.translate(&request.payload, &request.source_language, &request.target_language).await?;
        Ok(ProviderResponse {
            text,
            prompt_tokens: None,
            completion_tokens: None,
        })
    }
}
