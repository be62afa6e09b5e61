pub mod client;
pub mod protocol;
pub mod provider;
pub mod providers;

pub use client::{GenerationClient, GenerationOutcome, DEFAULT_TEMPERATURE};
pub use provider::{describe_chain, LLMError, TextGenerator};
pub use providers::GeminiProvider;
