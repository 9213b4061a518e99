//! Pre-compiled regex patterns shared by the annotation passes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Any HTML tag, opening or closing. Shielded before matching so phrase
/// and word patterns never fire inside tag names or attribute values.
pub(crate) fn html_tag() -> &'static Regex {
    static PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid HTML tag regex"));
    &PATTERN
}

/// A finalized phrase annotation span, wrapper and content together.
/// Shielded before the word pass so words inside a claimed phrase are
/// never independently wrapped.
pub(crate) fn phrase_span() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"<span class="known-phrase"[^>]*>.*?</span>"#)
            .expect("valid phrase span regex")
    });
    &PATTERN
}

/// A Scandinavian letter hidden inside an HTML comment while the
/// markdown renderer runs.
pub(crate) fn protected_letter() -> &'static Regex {
    static PATTERN: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"<!--([åäöÅÄÖ])-->").expect("valid protected letter regex"));
    &PATTERN
}

/// Escapes a phrase key for use in a match pattern, widening each
/// Scandinavian vowel to also accept its de-accented ASCII spelling
/// (å matches å or a, ä matches ä or a, ö matches ö or o).
pub(crate) fn escape_with_alternates(key: &str) -> String {
    let mut pattern = String::with_capacity(key.len() * 2);
    for ch in key.chars() {
        match ch {
            'å' | 'Å' => pattern.push_str("(å|a)"),
            'ä' | 'Ä' => pattern.push_str("(ä|a)"),
            'ö' | 'Ö' => pattern.push_str("(ö|o)"),
            _ => pattern.push_str(&regex::escape(&ch.to_string())),
        }
    }
    pattern
}
