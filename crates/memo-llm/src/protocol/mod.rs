//! Provider wire formats.

pub mod gemini;

pub use gemini::{GeminiRequest, GeminiResponse};
