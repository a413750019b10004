use crate::config::Settings;
use crate::document::{extract_text, split_text, validate_text};
use crate::generate::{generate_questions, Completion, GenerateError, QuestionItem};

pub const INSUFFICIENT_TEXT: &str = "Could not extract sufficient text from PDF";

pub const NO_QUESTIONS: &str = "Failed to generate questions. Please try:";

pub const REMEDIATION_HINTS: [&str; 3] = [
    "Text-based PDF (not scanned)",
    "At least 2-3 paragraphs of content",
    "Clear English text structure",
];

/// Where a generation run ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ready(Vec<QuestionItem>),

    /// stopped before chunking; carries the extraction error, if there was one
    InsufficientText { extraction_error: Option<String> },

    /// every chunk came back empty
    NoQuestions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Chunked { total: usize },
    ChunkDone { index: usize, total: usize, kept: usize },
}

/// Run the whole pipeline on the raw bytes of a PDF.
///
/// A PDF that cannot be read is reported through the outcome rather than as
/// an error. Only fatal generation failures are returned as `Err`.
pub fn run<C, F>(
    client: &C,
    pdf: &[u8],
    settings: &Settings,
    on_progress: F,
) -> Result<Outcome, GenerateError>
where
    C: Completion + ?Sized,
    F: FnMut(Progress),
{
    let (text, extraction_error) = match extract_text(pdf) {
        Ok(text) => (text, None),
        Err(e) => {
            log::error!("Error reading PDF: {}", e);
            (String::new(), Some(e.to_string()))
        }
    };

    generate(client, &text, extraction_error, settings, on_progress)
}

/// Chunk already extracted `text` and collect questions for every chunk.
pub fn generate_from_text<C, F>(
    client: &C,
    text: &str,
    settings: &Settings,
    on_progress: F,
) -> Result<Outcome, GenerateError>
where
    C: Completion + ?Sized,
    F: FnMut(Progress),
{
    generate(client, text, None, settings, on_progress)
}

fn generate<C, F>(
    client: &C,
    text: &str,
    extraction_error: Option<String>,
    settings: &Settings,
    mut on_progress: F,
) -> Result<Outcome, GenerateError>
where
    C: Completion + ?Sized,
    F: FnMut(Progress),
{
    if !validate_text(text) {
        return Ok(Outcome::InsufficientText { extraction_error });
    }

    let chunks = split_text(text, &settings.splitter);
    let total = chunks.len();
    log::info!("split text into {} chunks", total);
    on_progress(Progress::Chunked { total });

    let mut questions = Vec::new();
    for (index, chunk) in chunks.iter().enumerate() {
        let set = generate_questions(client, chunk)?;
        let kept = set.questions.len().min(settings.questions_per_chunk());
        questions.extend(set.questions.into_iter().take(kept));
        on_progress(Progress::ChunkDone { index, total, kept });
    }

    if questions.is_empty() {
        log::warn!("no questions were generated from {} chunks", total);
        return Ok(Outcome::NoQuestions);
    }
    Ok(Outcome::Ready(questions))
}
