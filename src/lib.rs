//! Turn a PDF into a self-paced quiz.
//!
//! The pipeline runs strictly forward: text is extracted from the document,
//! checked for length, split into overlapping chunks, and each chunk is sent to
//! a hosted language model that answers with question/answer pairs. The
//! resulting list is then played through [`quiz::Quiz`].

pub mod config;
pub mod document;
pub mod generate;
pub mod pipeline;
pub mod quiz;

pub use config::Settings;
pub use generate::{Completion, GenerateError, GroqClient, QuestionItem, QuestionSet};
pub use pipeline::{Outcome, Progress};
pub use quiz::{Phase, Quiz, QuizState};
