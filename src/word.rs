//! Word annotation: the second matching pass.
//!
//! Runs over phrase-annotated text with both the finalized phrase spans
//! and all HTML tags shielded. Every occurrence of every known word is
//! wrapped; keys are processed length-descending and there is no
//! cross-key overlap filter — the first-processed key wins per position
//! because its substitution consumes the text. That order dependence is
//! documented behavior, not something to fix here.

use regex::Regex;
use tracing::warn;

use crate::error::AnnotationError;
use crate::lexicon::Lexicon;
use crate::patterns;
use crate::shield::Shield;

/// Wraps every case-insensitive word-boundary occurrence of every known
/// word in a `<span class="known-word" data-word="...">` wrapper. The
/// data attribute carries the exact matched surface, not the key.
///
/// Never fails: an internal error is logged and the input is returned
/// unmodified.
pub fn annotate_words(text: &str, lexicon: &Lexicon) -> String {
    match annotate_words_inner(text, lexicon) {
        Ok(annotated) => annotated,
        Err(err) => {
            warn!(error = %err, "word annotation failed, returning text unchanged");
            text.to_string()
        }
    }
}

fn annotate_words_inner(text: &str, lexicon: &Lexicon) -> Result<String, AnnotationError> {
    let mut keys = lexicon.known_word_keys();
    if keys.is_empty() {
        return Ok(text.to_string());
    }
    keys.sort_by(|a, b| b.len().cmp(&a.len()));

    // Phrase spans first, then remaining tags: a word inside an already
    // claimed phrase must never be wrapped on its own.
    let mut phrase_shield = Shield::new("PHRASE");
    let mut working = phrase_shield.protect(text, patterns::phrase_span());
    let mut tag_shield = Shield::new("HTML");
    working = tag_shield.protect(&working, patterns::html_tag());

    for key in keys {
        let pattern = word_pattern(key)?;
        working = pattern
            .replace_all(&working, |caps: &regex::Captures<'_>| {
                let surface = &caps[0];
                format!(r#"<span class="known-word" data-word="{surface}">{surface}</span>"#)
            })
            .into_owned();
    }

    working = tag_shield.restore(&working);
    Ok(phrase_shield.restore(&working))
}

fn word_pattern(key: &str) -> Result<Regex, AnnotationError> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(key))).map_err(|source| {
        AnnotationError::Pattern {
            key: key.to_string(),
            source,
        }
    })
}
