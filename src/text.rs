//! Character-class normalisation and token extraction.
//!
//! Retrieval and grounding both lower-case their input, blank out every
//! character outside a retained class, and split on whitespace. Only the
//! length threshold and the number of tokens kept differ.

use serde::{Deserialize, Serialize};

/// Characters that survive normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    /// ASCII letters and digits plus Hangul syllables.
    Legacy,
    /// `Legacy` plus Hiragana, Katakana and CJK ideographs.
    #[default]
    Cjk,
}

impl Charset {
    /// Whether `c` (already lower-cased) is kept.
    pub fn retains(self, c: char) -> bool {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || is_hangul_syllable(c) {
            return true;
        }
        match self {
            Charset::Legacy => false,
            Charset::Cjk => is_japanese(c),
        }
    }
}

fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

fn is_japanese(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'      // hiragana
        | '\u{30A0}'..='\u{30FF}'    // katakana, incl. prolonged sound mark
        | '\u{FF66}'..='\u{FF9F}'    // halfwidth katakana
        | '\u{3400}'..='\u{4DBF}'    // CJK extension A
        | '\u{4E00}'..='\u{9FFF}'    // CJK unified ideographs
    )
}

/// Lower-case `text` and replace every non-retained character with a space.
pub fn normalize(text: &str, charset: Charset) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_whitespace() || charset.retains(c) {
                c
            } else {
                ' '
            }
        })
        .collect()
}

/// Whitespace-separated normalised words with at least `min_chars`
/// characters, truncated to `max_words`.
pub fn words(text: &str, charset: Charset, min_chars: usize, max_words: usize) -> Vec<String> {
    normalize(text, charset)
        .split_whitespace()
        .filter(|w| w.chars().count() >= min_chars)
        .take(max_words)
        .map(str::to_string)
        .collect()
}

/// Search tokens for a query: up to 6 words of 3+ characters, or the raw
/// query when none qualify.
pub fn query_tokens(query: &str, charset: Charset) -> Vec<String> {
    let tokens = words(query, charset, 3, 6);
    if tokens.is_empty() {
        vec![query.to_string()]
    } else {
        tokens
    }
}

/// Grounding vocabulary: up to 10 context words of 4+ characters.
pub fn context_words(context: &str, charset: Charset) -> Vec<String> {
    words(context, charset, 4, 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(
            normalize("What's the COST?", Charset::Legacy),
            "what s the cost "
        );
    }

    #[test]
    fn test_legacy_keeps_hangul_drops_japanese() {
        assert_eq!(normalize("코 성형", Charset::Legacy), "코 성형");
        assert_eq!(normalize("病院です", Charset::Legacy).trim(), "");
    }

    #[test]
    fn test_cjk_keeps_japanese() {
        assert_eq!(normalize("病院です。", Charset::Cjk), "病院です ");
        assert_eq!(normalize("インプラント", Charset::Cjk), "インプラント");
    }

    #[test]
    fn test_query_tokens_filters_and_truncates() {
        let tokens = query_tokens(
            "Do you have any hospitals that specialize in dental implants?",
            Charset::Cjk,
        );
        assert_eq!(
            tokens,
            vec!["you", "have", "any", "hospitals", "that", "specialize"]
        );
    }

    #[test]
    fn test_query_tokens_falls_back_to_raw_query() {
        assert_eq!(query_tokens("a b?", Charset::Cjk), vec!["a b?"]);
    }

    #[test]
    fn test_token_length_counts_characters_not_bytes() {
        // Two Hangul syllables are six bytes but only two characters.
        assert!(words("코성", Charset::Legacy, 3, 6).is_empty());
        assert_eq!(words("임플란트", Charset::Legacy, 3, 6), vec!["임플란트"]);
    }

    #[test]
    fn test_context_words() {
        let words = context_words(
            "[treatment] Rhinoplasty, dental implants. [hospital] Partner clinics in Seoul.",
            Charset::Cjk,
        );
        assert_eq!(
            words,
            vec![
                "treatment",
                "rhinoplasty",
                "dental",
                "implants",
                "hospital",
                "partner",
                "clinics",
                "seoul"
            ]
        );
    }
}
