//! Question answering over the extracted document
//!
//! Embeds the document and the question in a fixed prompt and returns the
//! model's first completion.

use crate::inference::{InferenceError, TextGenerator};
use crate::types::config::GenerationParams;
use std::fmt;

/// Prefix of every failed answer's text
pub const ERROR_INDICATOR: &str = "Error: ";

/// Outcome of one question
#[derive(Debug, Clone, PartialEq)]
pub enum QueryAnswer {
    /// Trimmed completion text
    Answered(String),
    /// Generation failed; holds the error description
    Failed(String),
}

impl QueryAnswer {
    pub fn is_error(&self) -> bool {
        matches!(self, QueryAnswer::Failed(_))
    }
}

impl fmt::Display for QueryAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryAnswer::Answered(text) => f.write_str(text),
            QueryAnswer::Failed(message) => write!(f, "{ERROR_INDICATOR}{message}"),
        }
    }
}

/// Build the prompt sent to the model
pub fn build_prompt(context: &str, question: &str) -> String {
    format!("### Context:\n{context}\n\n### Human: {question}\n### Assistant:")
}

/// Answer `question` about `context`
///
/// Never fails: generation errors are returned as `QueryAnswer::Failed`.
pub fn ask_pdf_question(
    model: &dyn TextGenerator,
    context: &str,
    question: &str,
    params: &GenerationParams,
) -> QueryAnswer {
    let prompt = build_prompt(context, question);
    tracing::info!(
        "Answering question ({} chars) over {} chars of context",
        question.len(),
        context.len()
    );

    let result = model.complete(&prompt, params).and_then(|completion| {
        completion
            .first_text()
            .map(|text| text.trim().to_string())
            .ok_or(InferenceError::NoCompletion)
    });

    match result {
        Ok(answer) => QueryAnswer::Answered(answer),
        Err(e) => {
            tracing::error!("Generation failed: {}", e);
            QueryAnswer::Failed(e.to_string())
        }
    }
}
