//! The normalization entry point: prompt, generate, extract, record.

use thiserror::Error;

use memo_llm::{GenerationClient, GenerationOutcome, DEFAULT_TEMPERATURE};

use crate::classifier::{ErrorCategory, ErrorClassifier};
use crate::extraction::{extract, ExtractionResult};
use crate::history::{HistoryEntry, HistoryLog};
use crate::prompt::PromptBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("input text is empty")]
    EmptyInput,

    #[error("generation failed ({category}): {message}")]
    Generation {
        category: ErrorCategory,
        message: String,
    },
}

impl NormalizeError {
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::EmptyInput => None,
            Self::Generation { category, .. } => Some(*category),
        }
    }
}

pub struct NotePipeline {
    prompt: PromptBuilder,
    client: GenerationClient,
    classifier: ErrorClassifier,
    temperature: f32,
}

impl NotePipeline {
    pub fn new(prompt: PromptBuilder, client: GenerationClient) -> Self {
        Self {
            prompt,
            client,
            classifier: ErrorClassifier::default(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_classifier(mut self, classifier: ErrorClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn prompt_builder(&self) -> &PromptBuilder {
        &self.prompt
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Turn a raw note into a memo body plus the unconfirmed item list.
    ///
    /// Whitespace-only input is rejected before any request is made. A
    /// failed generation is classified, never propagated as a panic.
    pub async fn normalize(&self, raw_text: &str) -> Result<ExtractionResult, NormalizeError> {
        if raw_text.trim().is_empty() {
            return Err(NormalizeError::EmptyInput);
        }

        let prompt = self.prompt.build_for(raw_text);
        match self.client.generate(&prompt, self.temperature).await {
            GenerationOutcome::Success(raw_output) => {
                let result = extract(&raw_output);
                log::info!(
                    "Normalized note: {} chars in, {} chars out, unconfirmed: {}",
                    raw_text.chars().count(),
                    result.clean_body.chars().count(),
                    result.unconfirmed_items.as_deref().unwrap_or("-")
                );
                Ok(result)
            }
            GenerationOutcome::Failure(message) => {
                let category = self.classifier.classify(&message);
                log::warn!("Normalization failed as {}: {}", category, message);
                Err(NormalizeError::Generation { category, message })
            }
        }
    }

    /// [`NotePipeline::normalize`], recording the interaction in `history`
    /// only when generation succeeded.
    pub async fn normalize_into(
        &self,
        raw_text: &str,
        history: &mut HistoryLog,
    ) -> Result<ExtractionResult, NormalizeError> {
        let result = self.normalize(raw_text).await?;
        history.record(HistoryEntry::new(
            raw_text,
            result.clean_body.clone(),
            result.unconfirmed_items.clone(),
        ));
        Ok(result)
    }
}
