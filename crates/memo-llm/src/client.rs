//! Generation boundary.
//!
//! `GenerationClient` is the only place where a provider call happens. Every
//! provider error is folded into [`GenerationOutcome::Failure`] here, so
//! nothing past this point has to deal with `LLMError`.

use std::sync::Arc;

use crate::provider::{describe_chain, TextGenerator};

/// Low temperature keeps the memo close to the fixed layout.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    Failure(String),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }
}

#[derive(Clone)]
pub struct GenerationClient {
    generator: Arc<dyn TextGenerator>,
}

impl GenerationClient {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn from_generator<G: TextGenerator + 'static>(generator: G) -> Self {
        Self::new(Arc::new(generator))
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Send one request. No retries; the caller decides whether to re-invoke.
    pub async fn generate(&self, prompt: &str, temperature: f32) -> GenerationOutcome {
        match self.generator.generate_text(prompt, temperature).await {
            Ok(text) => GenerationOutcome::Success(text),
            Err(err) => {
                let message = describe_chain(&err);
                log::warn!("Generation with model '{}' failed: {}", self.model(), message);
                GenerationOutcome::Failure(message)
            }
        }
    }
}
