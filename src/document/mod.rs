mod chunk;
mod extract;
mod validate;

pub use chunk::{split_text, SplitterConfig};
pub use extract::{extract_text, ExtractError};
pub use validate::{validate_text, LOW_TEXT_WARNING, MIN_TEXT_CHARS};

#[cfg(test)]
pub(crate) use extract::tests::build_pdf;
