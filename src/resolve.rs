//! Sense resolution: from a clicked annotation key back to senses.

use tracing::warn;

use crate::lexicon::{Lexicon, SenseRecord};

impl Lexicon {
    /// Resolves a clicked word surface to its senses.
    ///
    /// Fallback chain, first success wins: base-form match, exact index
    /// key, then a substring scan over the stored source identifiers.
    /// A miss is a normal outcome for the UI, not an error.
    pub fn resolve_word(&self, surface: &str) -> Option<&[SenseRecord]> {
        let needle = surface.to_lowercase();

        if let Some((_, senses)) = self
            .words()
            .iter()
            .find(|(_, senses)| senses.iter().any(|s| s.base_form.to_lowercase() == needle))
        {
            return Some(senses);
        }

        if let Some(senses) = self.words().get(&needle) {
            return Some(senses);
        }

        if let Some((_, senses)) = self.words().iter().find(|(_, senses)| {
            senses
                .iter()
                .any(|s| s.key.to_lowercase().contains(&needle))
        }) {
            return Some(senses);
        }

        warn!(word = %surface, "no senses found for clicked word");
        None
    }

    /// Resolves a clicked phrase key: a single exact lowercase lookup.
    pub fn resolve_phrase(&self, surface: &str) -> Option<&[SenseRecord]> {
        let senses = self.phrases().get(&surface.to_lowercase());
        if senses.is_none() {
            warn!(phrase = %surface, "no senses found for clicked phrase");
        }
        senses
    }
}
