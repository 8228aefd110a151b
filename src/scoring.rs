//! Heuristic response scorers.
//!
//! Both scorers are pure functions of their string arguments.

use crate::inquiry::Language;
use crate::text::{self, Charset};

/// Fraction of context words a response must reuse to count as grounded.
pub const GROUNDING_THRESHOLD: f64 = 0.3;

/// Topical keywords checked by [`intent_match`].
pub fn intent_keywords(language: Language) -> &'static [&'static str] {
    match language {
        Language::En => &[
            "surgery",
            "treatment",
            "procedure",
            "clinic",
            "hospital",
            "consultation",
            "cost",
            "price",
        ],
        Language::Ja => &["手術", "治療", "クリニック", "病院", "相談", "費用", "価格"],
        Language::Ko => &["수술", "치료", "병원", "상담", "비용", "가격"],
    }
}

/// Keyword list for a raw language code; unknown codes use English.
pub fn intent_keywords_for_code(code: &str) -> &'static [&'static str] {
    intent_keywords(code.parse().unwrap_or(Language::En))
}

/// Does the response address the topical keywords present in the inquiry?
///
/// An inquiry with none of the language's keywords passes vacuously.
pub fn intent_match(inquiry: &str, response: &str, language: &str) -> bool {
    let inquiry = inquiry.to_lowercase();
    let response = response.to_lowercase();

    let mut present = intent_keywords_for_code(language)
        .iter()
        .filter(|kw| inquiry.contains(*kw))
        .peekable();

    if present.peek().is_none() {
        return true;
    }
    present.any(|kw| response.contains(kw))
}

/// Does the response reuse at least 30% of the leading context vocabulary?
pub fn grounding(response: &str, context: &str, charset: Charset) -> bool {
    if context.trim().is_empty() {
        return false;
    }

    let words = text::context_words(context, charset);
    if words.is_empty() {
        return false;
    }

    let response = response.to_lowercase();
    let matches = words.iter().filter(|w| response.contains(w.as_str())).count();
    matches as f64 / words.len() as f64 >= GROUNDING_THRESHOLD
}
