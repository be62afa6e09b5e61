//! Google Gemini provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::protocol::gemini::{error_message_from_body, GeminiRequest, GeminiResponse};
use crate::provider::{LLMError, Result, TextGenerator};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-flash-lite-latest";

/// Google Gemini API provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a custom base URL (e.g., for proxies or alternative endpoints).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model name (e.g., "gemini-flash-lite-latest").
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Bound the whole request with a client-side timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

/// Map a non-success status and its body to an error variant.
fn error_for_status(status: StatusCode, body: &str) -> LLMError {
    let message = error_message_from_body(body);

    match status.as_u16() {
        401 | 403 => LLMError::Auth(format!("HTTP {}: {}", status.as_u16(), message)),
        400 if body.contains("API_KEY_INVALID") => {
            LLMError::Auth(format!("HTTP 400: {}", message))
        }
        429 => LLMError::RateLimit(format!("HTTP 429: {}", message)),
        408 | 504 => LLMError::Timeout(format!("HTTP {}: {}", status.as_u16(), message)),
        code => LLMError::Api(format!("HTTP {}: {}", code, message)),
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate_text(&self, prompt: &str, temperature: f32) -> Result<String> {
        let request = GeminiRequest::single_turn(prompt, temperature);

        log::debug!(
            "Gemini request: model={}, prompt_chars={}, temperature={}",
            self.model,
            prompt.chars().count(),
            temperature
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(LLMError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(LLMError::from_transport)?;

        if !status.is_success() {
            log::warn!("Gemini returned HTTP {}", status);
            return Err(error_for_status(status, &body));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)?;
        match parsed.text() {
            Some(text) => {
                log::debug!("Gemini response received: {} chars", text.chars().count());
                Ok(text)
            }
            None => Err(LLMError::EmptyResponse(parsed.empty_reason())),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
