//! Derived post fields: reading time and excerpt

use serde::Serialize;

/// Estimated reading time of a post body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingTime {
    /// Human readable form, `"5 min read"` or `"40 sec read"`
    pub text: String,
    pub words: usize,
    pub minutes: f64,
}

impl ReadingTime {
    /// Estimate from the raw body at `words_per_minute`
    pub fn estimate(body: &str, words_per_minute: usize) -> Self {
        let wpm = words_per_minute.max(1);
        let words = count_words(body);
        let minutes = words as f64 / wpm as f64;

        let seconds = (words * 60).div_ceil(wpm);
        let text = if seconds < 60 {
            format!("{} sec read", seconds)
        } else {
            format!("{} min read", words.div_ceil(wpm))
        };

        Self {
            text,
            words,
            minutes,
        }
    }
}

/// Count words, treating every CJK ideograph as a word of its own
pub fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .map(|token| {
            let cjk = token.chars().filter(|c| is_cjk(*c)).count();
            let latin = token
                .chars()
                .any(|c| c.is_alphanumeric() && !is_cjk(c));
            cjk + usize::from(latin)
        })
        .sum()
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30ff}'   // Hiragana, Katakana
        | '\u{3400}'..='\u{4dbf}' // CJK Extension A
        | '\u{4e00}'..='\u{9fff}' // CJK Unified Ideographs
        | '\u{ac00}'..='\u{d7af}' // Hangul
        | '\u{f900}'..='\u{faff}' // CJK Compatibility Ideographs
    )
}

/// First paragraph of the body with `#`, `*` and backticks removed
pub fn derive_excerpt(body: &str) -> String {
    let first = body.split("\n\n").next().unwrap_or_default();
    first
        .chars()
        .filter(|c| !matches!(c, '#' | '*' | '`'))
        .collect::<String>()
        .trim()
        .to_string()
}
