//! Acknowledgment guard.
//!
//! Greetings and thanks short-circuit to a canned reply without touching any
//! collaborator. Matching is fuzzy so "thanks!" and "hello there!!" both
//! count.

/// Similarity threshold out of 100; matches must exceed it.
const SIMILARITY_THRESHOLD: u32 = 85;

const ACKNOWLEDGMENTS: &[&str] = &[
    "thank you",
    "thanks",
    "got it",
    "ok",
    "okay",
    "sure",
    "noted",
    "understood",
    "cool",
    "great",
    "awesome",
    "hi",
    "hello",
    "hey",
    "hi there",
    "hello there",
    "hi!",
    "hello!",
    "hey!",
    "hi there!",
    "hello there!",
];

/// Lowercase and collapse whitespace.
fn preprocess(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn is_acknowledgment(input: &str) -> bool {
    let cleaned = preprocess(input);
    ACKNOWLEDGMENTS
        .iter()
        .any(|phrase| similarity_ratio(&cleaned, phrase) > SIMILARITY_THRESHOLD)
}

/// Indel similarity in [0, 100], rounded: `100 * 2 * lcs / (len_a + len_b)`.
/// Equivalent to normalizing the insert/delete edit distance over the summed
/// lengths.
pub fn similarity_ratio(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 100;
    }
    let matches = lcs_length(&a_chars, &b_chars);
    ((200.0 * matches as f64) / total as f64).round() as u32
}

fn lcs_length(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ca in a.iter() {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_phrases_match() {
        assert!(is_acknowledgment("thank you"));
        assert!(is_acknowledgment("hello"));
        assert!(is_acknowledgment("OK"));
    }

    #[test]
    fn test_near_misses_match() {
        assert!(is_acknowledgment("thanks!"));
        assert!(is_acknowledgment("  Thanks  "));
        assert!(is_acknowledgment("hello there!!"));
    }

    #[test]
    fn test_questions_and_heavy_typos_do_not_match() {
        assert!(!is_acknowledgment("What is the minimum age for Policy X?"));
        assert!(!is_acknowledgment("thanks for nothing, what about premiums?"));
        // Transposition costs two edits under indel, landing below threshold.
        assert!(!is_acknowledgment("thnaks"));
    }

    #[test]
    fn test_similarity_ratio_bounds() {
        assert_eq!(similarity_ratio("", ""), 100);
        assert_eq!(similarity_ratio("abc", "abc"), 100);
        assert_eq!(similarity_ratio("abc", "xyz"), 0);
    }

    #[test]
    fn test_ratio_rounds_instead_of_truncating() {
        // 2 * 6 matching chars over 13 total = 92.3, which must clear the
        // threshold; truncating over max length would give exactly 85.
        assert_eq!(similarity_ratio("thanks!", "thanks"), 92);
        assert!(similarity_ratio("thanks!", "thanks") > SIMILARITY_THRESHOLD);
        assert_eq!(similarity_ratio("thnaks", "thanks"), 83);
    }
}
