/// Texts shorter than this (after trimming) are not worth sending to the model.
pub const MIN_TEXT_CHARS: usize = 100;

pub const LOW_TEXT_WARNING: &str =
    "The PDF appears to have very little text. It might be image-based.";

/// Returns `false` when `text` is too short to generate questions from.
pub fn validate_text(text: &str) -> bool {
    let len = text.trim().chars().count();
    if len < MIN_TEXT_CHARS {
        log::warn!("{} ({} characters)", LOW_TEXT_WARNING, len);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary() {
        assert!(!validate_text(&"a".repeat(99)));
        assert!(validate_text(&"a".repeat(100)));
    }

    #[test]
    fn test_whitespace_is_not_counted() {
        let padded = format!("  \n{}\n\t ", "b".repeat(99));
        assert!(!validate_text(&padded));
        assert!(!validate_text(""));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 60 two-byte characters: 120 bytes but only 60 characters
        assert!(!validate_text(&"é".repeat(60)));
        assert!(validate_text(&"é".repeat(100)));
    }
}
