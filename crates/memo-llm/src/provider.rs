use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl LLMError {
    /// Classify a transport error by what reqwest tells us about it.
    ///
    /// The request URL carries the API key as a query parameter, so it is
    /// stripped before the error is stored anywhere.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            LLMError::Timeout(describe_chain(&err))
        } else if err.is_connect() {
            LLMError::Connection(describe_chain(&err))
        } else {
            LLMError::Http(err)
        }
    }
}

/// Render an error followed by every source in its chain, `a: b: c`.
pub fn describe_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// A single-shot text generation capability.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a complete prompt
    ///
    /// # Arguments
    /// * `prompt` - The entire prompt, sent as one user turn
    /// * `temperature` - Sampling temperature
    async fn generate_text(&self, prompt: &str, temperature: f32) -> Result<String>;

    /// Model identifier used for requests, for logging
    fn model(&self) -> &str;
}
