#![deny(missing_docs)]
//! CV Relay core library.
//!
//! Context loading, prompt composition, LLM providers, answer generation and
//! reply sanitizing. Transport-agnostic.

/// Answer generation over the loaded context document.
pub mod answer;
/// Configuration management.
pub mod config;
/// Context document loading.
pub mod context;
/// LLM providers and the provider seam.
pub mod llm;
/// Prompt envelope composition.
pub mod prompt;
/// Reply cleanup.
pub mod sanitizer;
/// Utility functions.
pub mod utils;

pub use answer::{AnswerGenerator, AnswerOptions};
pub use context::{ContextDocument, ContextError};
