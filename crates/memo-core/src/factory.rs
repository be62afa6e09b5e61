//! Pipeline Factory
//!
//! Builds a ready-to-use pipeline from configuration.

use std::time::Duration;

use thiserror::Error;

use memo_llm::{GeminiProvider, GenerationClient, LLMError};

use crate::config::{ConfigError, MemoConfig};
use crate::history::HistoryLog;
use crate::pipeline::NotePipeline;
use crate::prompt::{PromptBuilder, UnknownFieldPolicy};

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] LLMError),
}

/// Create a Gemini provider from the configured key, endpoint and model.
pub fn create_provider(config: &MemoConfig) -> Result<GeminiProvider, FactoryError> {
    let api_key = config.api_key()?;

    let mut provider = GeminiProvider::new(api_key).with_model(config.model_name());

    if let Some(base_url) = config.api_base.as_deref().filter(|url| !url.is_empty()) {
        provider = provider.with_base_url(base_url);
    }

    if let Some(secs) = config.timeout_secs.filter(|secs| *secs > 0) {
        provider = provider.with_timeout(Duration::from_secs(secs))?;
    }

    log::info!("Using Gemini model '{}'", config.model_name());
    Ok(provider)
}

pub fn create_pipeline(config: &MemoConfig) -> Result<NotePipeline, FactoryError> {
    let provider = create_provider(config)?;
    let prompt = PromptBuilder::new(UnknownFieldPolicy::from_omit_flag(
        config.omit_unknown_fields,
    ));

    Ok(
        NotePipeline::new(prompt, GenerationClient::from_generator(provider))
            .with_temperature(config.temperature),
    )
}

/// A fresh, empty session log sized from configuration.
pub fn create_history(config: &MemoConfig) -> HistoryLog {
    HistoryLog::with_capacity(config.history_capacity)
}
