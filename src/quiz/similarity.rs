use std::sync::OnceLock;

use regex::Regex;

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap())
}

/// Lowercase, turn punctuation into spaces and sort the words.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let spaced = non_alphanumeric().replace_all(&lowered, " ");
    let mut tokens: Vec<&str> = spaced.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Word-order-insensitive similarity of two answers, from 0 to 100.
///
/// The ratio is `2 * matches / (len_a + len_b)` over the normalized strings,
/// where matches is the longest common subsequence of characters. Halves
/// round to even.
pub fn token_sort_ratio(answer: &str, expected: &str) -> u8 {
    let answer: Vec<char> = normalize(answer).chars().collect();
    let expected: Vec<char> = normalize(expected).chars().collect();
    if answer.is_empty() || expected.is_empty() {
        return 0;
    }

    let matches = common_subsequence_len(&answer, &expected);
    let numerator = 200 * matches;
    let denominator = answer.len() + expected.len();

    let quotient = numerator / denominator;
    let twice_remainder = 2 * (numerator % denominator);
    let rounded = if twice_remainder > denominator
        || (twice_remainder == denominator && quotient % 2 == 1)
    {
        quotient + 1
    } else {
        quotient
    };
    rounded.min(100) as u8
}

/// Characters to change to turn one normalized answer into the other.
pub fn edit_distance(answer: &str, expected: &str) -> usize {
    strsim::levenshtein(&normalize(answer), &normalize(expected))
}

/// A score at the threshold counts as correct.
pub fn is_correct(similarity: u8, threshold: u8) -> bool {
    similarity >= threshold
}

fn common_subsequence_len(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0; b.len() + 1];
    let mut current = vec![0; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
