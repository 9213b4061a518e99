//! Reversible protection of markup that must not be re-matched.
//!
//! Before a matching pass runs, every occurrence of a protected pattern
//! (HTML tags, finalized phrase spans) is swapped for an opaque
//! placeholder; after the pass the placeholders are substituted back.
//! This two-phase discipline is the only thing preventing structural
//! corruption, so `restore(protect(text)) == text` is a hard invariant.

use regex::Regex;

/// One protect/restore cycle. The placeholder counter is owned by the
/// shield, so concurrent annotation calls never share state.
#[derive(Debug)]
pub struct Shield {
    tag: &'static str,
    counter: usize,
    slots: Vec<(String, String)>,
}

impl Shield {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            counter: 0,
            slots: Vec::new(),
        }
    }

    /// Replaces every non-overlapping match of `pattern`, left to right,
    /// with a unique sequential placeholder. Zero matches returns the
    /// text unchanged and records nothing.
    pub fn protect(&mut self, text: &str, pattern: &Regex) -> String {
        pattern
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let placeholder = format!("###{}{}###", self.tag, self.counter);
                self.counter += 1;
                self.slots.push((placeholder.clone(), caps[0].to_string()));
                placeholder
            })
            .into_owned()
    }

    /// Substitutes every recorded placeholder back to its original text.
    pub fn restore(&self, text: &str) -> String {
        let mut restored = text.to_string();
        for (placeholder, original) in &self.slots {
            restored = restored.replacen(placeholder.as_str(), original, 1);
        }
        restored
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
}
