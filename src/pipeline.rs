//! End-to-end document processing: normalize, annotate, render.
//!
//! Annotation runs before markdown rendering, so the renderer must pass
//! the injected `<span>` wrappers through as opaque inline HTML. The
//! Scandinavian vowels are hidden inside HTML comments across the
//! render step; some renderer configurations mangle them otherwise.

use markdown::{Options as MarkdownOptions, to_html_with_options};

use crate::lexicon::Lexicon;
use crate::normalize;
use crate::patterns;
use crate::phrase::annotate_phrases;
use crate::word::annotate_words;

/// Annotates a text without rendering: phrase pass, then word pass.
pub fn annotate(text: &str, lexicon: &Lexicon) -> String {
    let phrased = annotate_phrases(text, lexicon);
    annotate_words(&phrased, lexicon)
}

/// Full document pipeline: normalization, both annotation passes, and
/// markdown rendering to HTML.
pub fn process(text: &str, lexicon: &Lexicon) -> String {
    let normalized = normalize::normalize(text);
    let annotated = annotate(&normalized, lexicon);
    render_html(&annotated)
}

/// Renders annotated markdown to HTML, letting the injected annotation
/// spans through untouched.
pub fn render_html(annotated: &str) -> String {
    let protected = protect_scandinavian(annotated);
    let options = markdown_options();
    let html =
        to_html_with_options(&protected, &options).unwrap_or_else(|_| protected.clone());
    restore_scandinavian(&html)
}

fn markdown_options() -> MarkdownOptions {
    let mut options = MarkdownOptions::gfm();
    // Annotation spans are trusted inline HTML, so allow them through.
    options.compile.allow_dangerous_html = true;
    options.compile.gfm_tagfilter = false;
    options
}

fn protect_scandinavian(text: &str) -> String {
    let mut protected = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            'å' | 'ä' | 'ö' | 'Å' | 'Ä' | 'Ö' => {
                protected.push_str("<!--");
                protected.push(ch);
                protected.push_str("-->");
            }
            _ => protected.push(ch),
        }
    }
    protected
}

fn restore_scandinavian(text: &str) -> String {
    patterns::protected_letter()
        .replace_all(text, "$1")
        .into_owned()
}
