use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitterConfig {
    /// boundary the text is cut on, never part of a chunk's edges
    pub separator: String,

    /// target chunk length in characters
    pub chunk_size: usize,

    /// trailing characters of one chunk repeated at the start of the next
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            separator: String::from("\n"),
            chunk_size: 800,
            chunk_overlap: 100,
        }
    }
}

/// Split `text` on the separator and regroup the pieces into chunks of at most
/// `chunk_size` characters.
///
/// Consecutive chunks share up to `chunk_overlap` characters of whole pieces.
/// A single piece longer than `chunk_size` is emitted on its own, unsplit.
pub fn split_text(text: &str, config: &SplitterConfig) -> Vec<String> {
    let pieces: Vec<&str> = if config.separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(config.separator.as_str())
            .filter(|piece| !piece.is_empty())
            .collect()
    };

    merge_pieces(&pieces, config)
}

fn merge_pieces(pieces: &[&str], config: &SplitterConfig) -> Vec<String> {
    let separator = config.separator.as_str();
    let sep_len = char_len(separator);

    let mut chunks = Vec::new();
    let mut window: VecDeque<&str> = VecDeque::new();
    let mut total = 0;

    for &piece in pieces {
        let len = char_len(piece);
        let joiner = if window.is_empty() { 0 } else { sep_len };

        if total + len + joiner > config.chunk_size && !window.is_empty() {
            if total > config.chunk_size {
                log::warn!(
                    "created a chunk of {} characters, longer than the configured {}",
                    total,
                    config.chunk_size
                );
            }
            push_chunk(&mut chunks, &window, separator);

            // keep only the tail that fits in the overlap and leaves room for `piece`
            while !window.is_empty()
                && (total > config.chunk_overlap
                    || (total + len + sep_len > config.chunk_size && total > 0))
            {
                let dropped = window.pop_front().map_or(0, char_len);
                let dropped_joiner = if window.is_empty() { 0 } else { sep_len };
                total = total.saturating_sub(dropped + dropped_joiner);
            }
        }

        window.push_back(piece);
        total += len + if window.len() > 1 { sep_len } else { 0 };
    }

    push_chunk(&mut chunks, &window, separator);
    chunks
}

fn push_chunk(chunks: &mut Vec<String>, window: &VecDeque<&str>, separator: &str) {
    let joined = window.iter().copied().collect::<Vec<&str>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
