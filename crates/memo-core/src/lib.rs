pub mod classifier;
pub mod config;
pub mod extraction;
pub mod factory;
pub mod history;
pub mod pipeline;
pub mod prompt;

pub use classifier::{classify, ClassificationRule, ErrorCategory, ErrorClassifier};
pub use config::{ConfigError, MemoConfig};
pub use extraction::{extract, ExtractionResult, UnconfirmedExtractor};
pub use factory::{create_history, create_pipeline, FactoryError};
pub use history::{HistoryEntry, HistoryLog};
pub use pipeline::{NormalizeError, NotePipeline};
pub use prompt::{PromptBuilder, UnknownFieldPolicy};
