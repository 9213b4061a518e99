//! Phrase annotation: the first matching pass.
//!
//! Phrases are tried longest/most-specific first over tag-shielded text,
//! and each accepted match claims its character range so no later phrase
//! can overlap it. The pass is best-effort: on any internal failure the
//! caller gets the input text back unchanged.

use regex::Regex;
use tracing::warn;

use crate::error::AnnotationError;
use crate::lexicon::Lexicon;
use crate::patterns;
use crate::shield::Shield;

/// A claimed character range in the text under annotation, half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSpan {
    pub start: usize,
    pub end: usize,
    pub key: String,
    pub kind: SpanKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Phrase,
    Word,
}

impl AnnotationSpan {
    /// Inclusive interval test: adjacent-at-boundary counts as overlap,
    /// so a phrase can never start exactly where another one ends.
    fn overlaps(&self, start: usize, end: usize) -> bool {
        start <= self.end && end >= self.start
    }
}

/// Wraps every non-overlapping phrase occurrence in a
/// `<span class="known-phrase" data-phrase="...">` wrapper.
///
/// Never fails: an internal error is logged and the input is returned
/// unmodified, so the reader always sees some content.
pub fn annotate_phrases(text: &str, lexicon: &Lexicon) -> String {
    match annotate_phrases_inner(text, lexicon) {
        Ok(annotated) => annotated,
        Err(err) => {
            warn!(error = %err, "phrase annotation failed, returning text unchanged");
            text.to_string()
        }
    }
}

fn annotate_phrases_inner(text: &str, lexicon: &Lexicon) -> Result<String, AnnotationError> {
    if lexicon.phrases().is_empty() {
        return Ok(text.to_string());
    }

    let mut shield = Shield::new("HTML");
    let mut working = shield.protect(text, patterns::html_tag());

    let mut accepted: Vec<AnnotationSpan> = Vec::new();
    for key in sorted_phrase_keys(lexicon) {
        let pattern = phrase_pattern(key)?;
        let mut pos = 0;
        while let Some(found) = pattern.find_at(&working, pos) {
            let (start, end) = (found.start(), found.end());
            if end == start {
                pos = start + 1;
                continue;
            }
            if accepted.iter().any(|span| span.overlaps(start, end)) {
                pos = end;
                continue;
            }
            let surface = found.as_str().to_string();
            let replacement =
                format!(r#"<span class="known-phrase" data-phrase="{key}">{surface}</span>"#);
            // Claim the whole inserted wrapper, not just the matched
            // surface: later sub-phrases must not fire inside the span
            // markup or its attribute text.
            accepted.push(AnnotationSpan {
                start,
                end: start + replacement.len(),
                key: key.to_string(),
                kind: SpanKind::Phrase,
            });
            working.replace_range(start..end, &replacement);
            // Continue after the inserted markup so the scan never
            // re-matches inside it.
            pos = start + replacement.len();
            if pos >= working.len() {
                break;
            }
        }
    }

    Ok(shield.restore(&working))
}

/// Phrase key precedence: longer keys first; on equal length a key that
/// is a substring of another candidate sorts after it, so the containing
/// phrase claims the span before its sub-phrase is tried.
fn sorted_phrase_keys(lexicon: &Lexicon) -> Vec<&str> {
    let mut keys: Vec<&str> = lexicon.phrases().keys().collect();
    keys.sort_by(|a, b| {
        b.len().cmp(&a.len()).then_with(|| {
            if b.contains(a) {
                std::cmp::Ordering::Greater
            } else if a.contains(b) {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Equal
            }
        })
    });
    keys
}

/// Case-insensitive, word-boundary-anchored pattern for one phrase key,
/// with the Scandinavian vowels widened to their ASCII substitutions.
fn phrase_pattern(key: &str) -> Result<Regex, AnnotationError> {
    let escaped = patterns::escape_with_alternates(key);
    Regex::new(&format!(r"(?i)(\b|^){escaped}(\b|$)")).map_err(|source| {
        AnnotationError::Pattern {
            key: key.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;

    fn lexicon_with_phrases(entries: &[(&str, &str)]) -> Lexicon {
        let body = entries
            .iter()
            .enumerate()
            .map(|(i, (phrase, translation))| {
                format!(r#""p{i}": {{"phrase": "{phrase}", "translation": "{translation}"}}"#)
            })
            .collect::<Vec<_>>()
            .join(",");
        Lexicon::load(&format!("{{{body}}}"), "{}").expect("phrase lexicon loads")
    }

    #[test]
    fn wraps_a_known_phrase() {
        let lexicon = lexicon_with_phrases(&[("gå på", "to attend")]);
        let out = annotate_phrases("Vi ska gå på bio.", &lexicon);
        assert_eq!(
            out,
            r#"Vi ska <span class="known-phrase" data-phrase="gå på">gå på</span> bio."#
        );
    }

    #[test]
    fn longer_phrase_wins_over_its_prefix() {
        let lexicon = lexicon_with_phrases(&[("a b", "short"), ("a b c", "long")]);
        let out = annotate_phrases("a b c", &lexicon);
        assert_eq!(
            out,
            r#"<span class="known-phrase" data-phrase="a b c">a b c</span>"#
        );
    }

    #[test]
    fn accepted_spans_never_overlap() {
        let lexicon = lexicon_with_phrases(&[("till exempel", "for example")]);
        let out = annotate_phrases("till exempel och till exempel", &lexicon);
        assert_eq!(out.matches("known-phrase").count(), 2);
        assert!(!out.contains("<span class=\"known-phrase\" data-phrase=\"till exempel\"><span"));
    }

    #[test]
    fn matching_is_case_insensitive_and_keeps_surface() {
        let lexicon = lexicon_with_phrases(&[("gå på", "to attend")]);
        let out = annotate_phrases("Gå på bio!", &lexicon);
        assert!(out.contains(r#"data-phrase="gå på""#));
        assert!(out.contains(">Gå på</span>"));
    }

    #[test]
    fn deaccented_spelling_still_matches() {
        let lexicon = lexicon_with_phrases(&[("gå på", "to attend")]);
        let out = annotate_phrases("vi ska ga pa bio", &lexicon);
        assert!(out.contains(">ga pa</span>"));
        assert!(out.contains(r#"data-phrase="gå på""#));
    }

    #[test]
    fn never_matches_inside_html_tags() {
        let lexicon = lexicon_with_phrases(&[("href", "bogus")]);
        let input = r#"<a href="x">href</a>"#;
        let out = annotate_phrases(input, &lexicon);
        assert!(out.starts_with(r#"<a href="x">"#));
        assert!(out.contains(r#"<span class="known-phrase" data-phrase="href">href</span>"#));
    }

    #[test]
    fn no_phrases_leaves_text_untouched() {
        let lexicon = Lexicon::default();
        let text = "helt vanlig text";
        assert_eq!(annotate_phrases(text, &lexicon), text);
    }

    #[test]
    fn phrase_keys_sort_longest_and_most_specific_first() {
        let lexicon = lexicon_with_phrases(&[("b c", "x"), ("a b c", "y"), ("x y", "z")]);
        let keys = sorted_phrase_keys(&lexicon);
        assert_eq!(keys[0], "a b c");
        assert!(keys.contains(&"b c"));
        assert!(keys.contains(&"x y"));
    }
}
