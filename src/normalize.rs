//! Input text normalization, run before any annotation pass.
//!
//! Uploaded texts arrive with inconsistent markdown habits (asterisk
//! bold, underscore bold, dash bullets, crammed paragraphs). This pass
//! canonicalizes them so the annotators and the renderer see one shape.

use once_cell::sync::Lazy;
use regex::Regex;

static STRONG_ASTERISK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid strong regex"));
static STRONG_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__([^_]+)__").expect("valid strong regex"));
static EMPHASIS_ASTERISK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\n]+)\*").expect("valid emphasis regex"));
static LEADING_DASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^-\s+").expect("valid dash regex"));
static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#{1,6})\s*(.+)$").expect("valid header regex"));
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*[+*]\s+").expect("valid list regex"));
static BLOCKQUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^>\s*(.+)$").expect("valid blockquote regex"));
static HORIZONTAL_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:[-*_]\s*){3,}$").expect("valid rule regex"));
static EXCESS_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid blank line regex"));
static BLOCK_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n([#>*])").expect("valid block start regex"));

/// Normalizes an uploaded text: byte-order marks and carriage returns
/// are stripped, formatting is canonicalized, paragraph spacing is
/// evened out, and single-asterisk emphasis becomes `<mark>`.
pub fn normalize(text: &str) -> String {
    let cleaned = text.replace('\u{FEFF}', "").replace("\r\n", "\n").replace('\r', "\n");
    let formatted = normalize_formatting(&cleaned);
    normalize_paragraphs(&formatted)
}

fn normalize_formatting(text: &str) -> String {
    let mut result = STRONG_ASTERISK.replace_all(text, "<strong>$1</strong>").into_owned();
    result = STRONG_UNDERSCORE.replace_all(&result, "<strong>$1</strong>").into_owned();
    result = EMPHASIS_ASTERISK.replace_all(&result, "<mark>$1</mark>").into_owned();
    // Dash bullets become em dashes, other bullet styles collapse to `*`.
    result = LEADING_DASH.replace_all(&result, "— ").into_owned();
    result = HEADER.replace_all(&result, "$1 $2").into_owned();
    result = LIST_MARKER.replace_all(&result, "* ").into_owned();
    result = BLOCKQUOTE.replace_all(&result, "> $1").into_owned();
    result = HORIZONTAL_RULE.replace_all(&result, "---").into_owned();
    result
}

fn normalize_paragraphs(text: &str) -> String {
    let trimmed = text
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    let collapsed = EXCESS_BLANK_LINES.replace_all(&trimmed, "\n\n").into_owned();
    // Block elements get a blank line in front so the renderer treats
    // them as their own paragraph.
    BLOCK_START.replace_all(&collapsed, "\n\n$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bom_and_carriage_returns() {
        assert_eq!(normalize("\u{FEFF}hej\r\nvärlden\r!"), "hej\nvärlden\n!");
    }

    #[test]
    fn asterisk_bold_becomes_strong() {
        assert_eq!(normalize("det är **viktigt** här"), "det är <strong>viktigt</strong> här");
        assert_eq!(normalize("det är __viktigt__ här"), "det är <strong>viktigt</strong> här");
    }

    #[test]
    fn single_asterisk_emphasis_becomes_mark() {
        assert_eq!(normalize("ett *ord* bara"), "ett <mark>ord</mark> bara");
    }

    #[test]
    fn emphasis_never_spans_lines() {
        let out = normalize("* punkt ett\n* punkt två");
        assert!(!out.contains("<mark>"));
    }

    #[test]
    fn dash_bullets_become_em_dashes() {
        assert_eq!(normalize("- första\n- andra"), "— första\n— andra");
    }

    #[test]
    fn excess_blank_lines_collapse() {
        assert_eq!(normalize("ett\n\n\n\n\ntvå"), "ett\n\ntvå");
    }

    #[test]
    fn headers_are_canonicalized() {
        assert_eq!(normalize("##   Rubrik"), "## Rubrik");
    }

    #[test]
    fn block_elements_get_breathing_room() {
        let out = normalize("text\n# rubrik");
        assert_eq!(out, "text\n\n# rubrik");
    }
}
