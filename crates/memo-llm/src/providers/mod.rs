//! LLM Providers
//!
//! This module contains the text-generation provider implementations.

pub mod gemini;

pub use gemini::GeminiProvider;
