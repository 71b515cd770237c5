//! LLM inference engine
//!
//! This module handles all interaction with llama-cpp for model loading and inference.

pub mod engine;
pub mod loader;

use crate::types::config::GenerationParams;
use std::path::PathBuf;
use thiserror::Error;

pub use engine::LlamaEngine;
pub use loader::{load_cached, load_model, ModelCache, ModelHandle, ModelSlot, MODEL_CACHE};

/// Errors raised while building the inference context
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("Model file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to initialize llama.cpp backend: {0}")]
    Backend(String),
    #[error("Failed to load model: {0}")]
    Model(String),
}

/// Errors raised while generating text
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Requested tokens ({prompt_tokens}) exceed context window of {n_ctx}")]
    ContextOverflow { prompt_tokens: usize, n_ctx: u32 },
    #[error("Tokenization failed: {0}")]
    Tokenize(String),
    #[error("Context creation failed: {0}")]
    Context(String),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Model returned no completion")]
    NoCompletion,
}

/// Why generation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// End-of-generation token or stop sequence
    Stop,
    /// Token budget exhausted
    Length,
}

/// One candidate continuation
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionChoice {
    pub text: String,
    pub finish_reason: FinishReason,
}

/// Result of a completion request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Completion {
    pub choices: Vec<CompletionChoice>,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

impl Completion {
    /// Text of the first candidate, if any
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.text.as_str())
    }
}

/// Text generation backend
///
/// Implementations must be callable through a shared reference; the loaded
/// model is never mutated after construction.
pub trait TextGenerator: Send + Sync {
    fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<Completion, InferenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text() {
        let completion = Completion {
            choices: vec![
                CompletionChoice { text: " first ".into(), finish_reason: FinishReason::Stop },
                CompletionChoice { text: "second".into(), finish_reason: FinishReason::Length },
            ],
            ..Default::default()
        };
        assert_eq!(completion.first_text(), Some(" first "));
        assert_eq!(Completion::default().first_text(), None);
    }

    #[test]
    fn test_load_error_messages() {
        let err = LoadError::NotFound(PathBuf::from("model.gguf"));
        assert_eq!(err.to_string(), "Model file not found: model.gguf");

        let err = InferenceError::ContextOverflow { prompt_tokens: 3000, n_ctx: 2048 };
        assert_eq!(
            err.to_string(),
            "Requested tokens (3000) exceed context window of 2048"
        );
    }
}
