mod client;
mod questions;

use thiserror::Error;

pub use client::{GroqClient, DEFAULT_BASE_URL, DEFAULT_MODEL, TEMPERATURE};
pub use questions::{
    generate_questions, parse_questions, QuestionItem, QuestionSet, MAX_ATTEMPTS, SYSTEM_PROMPT,
};

/// Something that turns a system prompt and a user message into the raw text
/// of a chat completion.
pub trait Completion {
    fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, GenerateError>;
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("GROQ_API_KEY is not set")]
    MissingCredential,

    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("Completion endpoint returned an error: {status}")]
    Server { status: u16 },

    #[error("Completion has no message content")]
    EmptyCompletion,

    #[error("Completion is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Completion has an unexpected shape: {0}")]
    Shape(String),
}

impl GenerateError {
    /// Parse and shape failures are worth another attempt; transport,
    /// credential and server failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerateError::Malformed(_) | GenerateError::Shape(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_parse_errors_retry() {
        let malformed = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(GenerateError::Malformed(malformed).is_retryable());
        assert!(GenerateError::Shape("no array".into()).is_retryable());

        assert!(!GenerateError::MissingCredential.is_retryable());
        assert!(!GenerateError::Server { status: 401 }.is_retryable());
        assert!(!GenerateError::EmptyCompletion.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = GenerateError::Server { status: 401 };
        assert_eq!(err.to_string(), "Completion endpoint returned an error: 401");
    }
}
