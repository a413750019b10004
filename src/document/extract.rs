use lopdf::Document;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("PDF parsing error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Document is encrypted")]
    Encrypted,

    #[error("Document has no pages")]
    NoPages,
}

/// Concatenate the text of every page in `data`, in page order.
///
/// Pages that yield no text (scans, blank separators) are skipped. Nothing is
/// inserted between pages.
pub fn extract_text(data: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(data).map_err(|e| match e {
        lopdf::Error::Decryption(_) => ExtractError::Encrypted,
        other => ExtractError::Pdf(other),
    })?;

    if doc.is_encrypted() {
        return Err(ExtractError::Encrypted);
    }

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(ExtractError::NoPages);
    }

    let mut text = String::new();
    for page_num in pages.keys() {
        let page_text = doc.extract_text(&[*page_num])?;
        if page_text.trim().is_empty() {
            log::debug!("page {} has no text layer, skipping", page_num);
            continue;
        }
        text.push_str(&page_text);
    }

    log::debug!(
        "extracted {} characters from {} pages",
        text.chars().count(),
        pages.len()
    );
    Ok(text)
}
