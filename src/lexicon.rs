//! Dictionary loading and the in-memory lexical indices.
//!
//! Two indices are kept: one for multi-word phrases and one for single
//! words. Both map a normalized (lowercased) key to the ordered list of
//! senses loaded under it. The lexicon is built once and read-only for
//! the rest of its life; reloading means constructing a new value.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::LoadError;

/// One dictionary sense: what a tooltip shows for a matched span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenseRecord {
    /// Source identifier the entry was loaded under, e.g. `springa_verb`.
    pub key: String,
    /// Canonical/lemma form of the word, or the phrase itself.
    pub base_form: String,
    /// Part of speech or phrase type; empty when the source omits it.
    pub part_of_speech: String,
    /// Translation; empty when the source omits it.
    pub translation: String,
    pub example: Option<String>,
    pub notes: Option<String>,
    /// Surface form exactly as written in the source entry, before
    /// normalization. Tooltips display this, not the lowercased key.
    pub original_surface: String,
}

/// Mapping from normalized key to its senses, in load order per key.
///
/// Invariant: a key is never mapped to an empty list; entries that fail
/// validation are skipped before insertion, not stored empty.
#[derive(Debug, Clone, Default)]
pub struct LexicalIndex {
    entries: BTreeMap<String, Vec<SenseRecord>>,
}

impl LexicalIndex {
    fn insert(&mut self, key: String, record: SenseRecord) {
        self.entries.entry(key).or_default().push(record);
    }

    /// Exact lookup on the normalized key. No fuzzy matching.
    pub fn get(&self, key: &str) -> Option<&[SenseRecord]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SenseRecord])> {
        self.entries
            .iter()
            .map(|(key, senses)| (key.as_str(), senses.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Raw phrase dictionary record as it appears in `phrases.json`.
#[derive(Debug, Deserialize)]
struct RawPhraseEntry {
    phrase: Option<String>,
    #[serde(rename = "type")]
    part_of_speech: Option<String>,
    translation: Option<String>,
    example: Option<String>,
    notes: Option<String>,
}

/// Raw word dictionary record as it appears in `dictionary.json`.
#[derive(Debug, Deserialize)]
struct RawWordEntry {
    base_word: Option<String>,
    #[serde(rename = "type", alias = "part_of_speech", alias = "kalbos dalis")]
    part_of_speech: Option<String>,
    translation: Option<String>,
    #[serde(alias = "additional")]
    example: Option<String>,
    notes: Option<String>,
}

/// The read-only dictionary store: a phrase index and a word index.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    phrases: LexicalIndex,
    words: LexicalIndex,
}

impl Lexicon {
    /// Builds a lexicon from the two dictionary JSON payloads.
    ///
    /// Either payload failing to parse, or not being an object, aborts
    /// the load. An individual entry missing its required field
    /// (`phrase` / `base_word`) is skipped with a warning instead.
    pub fn load(phrase_json: &str, word_json: &str) -> Result<Self, LoadError> {
        let mut lexicon = Self::default();
        lexicon.load_phrases(phrase_json)?;
        lexicon.load_words(word_json)?;
        Ok(lexicon)
    }

    /// Like [`Lexicon::load`], reading both payloads from disk.
    pub fn load_from_files(
        phrase_path: impl AsRef<Path>,
        word_path: impl AsRef<Path>,
    ) -> Result<Self, LoadError> {
        let phrase_json = fs::read_to_string(phrase_path)?;
        let word_json = fs::read_to_string(word_path)?;
        Self::load(&phrase_json, &word_json)
    }

    fn load_phrases(&mut self, json: &str) -> Result<(), LoadError> {
        for (id, value) in parse_mapping(json, "phrase")? {
            let entry = match serde_json::from_value::<RawPhraseEntry>(value) {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(entry = %id, error = %err, "skipping malformed phrase entry");
                    continue;
                }
            };
            let Some(surface) = entry.phrase.filter(|p| !p.trim().is_empty()) else {
                warn!(entry = %id, "skipping phrase entry without a phrase field");
                continue;
            };
            let key = surface.to_lowercase();
            self.phrases.insert(
                key,
                SenseRecord {
                    key: id,
                    base_form: surface.to_lowercase(),
                    part_of_speech: entry.part_of_speech.unwrap_or_default(),
                    translation: entry.translation.unwrap_or_default(),
                    example: entry.example,
                    notes: entry.notes,
                    original_surface: surface,
                },
            );
        }
        Ok(())
    }

    fn load_words(&mut self, json: &str) -> Result<(), LoadError> {
        for (id, value) in parse_mapping(json, "word")? {
            let entry = match serde_json::from_value::<RawWordEntry>(value) {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(entry = %id, error = %err, "skipping malformed word entry");
                    continue;
                }
            };
            let Some(surface) = entry.base_word.filter(|w| !w.trim().is_empty()) else {
                warn!(entry = %id, "skipping word entry without a base_word field");
                continue;
            };
            let base = surface.to_lowercase();
            let record = SenseRecord {
                key: id.clone(),
                base_form: base.clone(),
                part_of_speech: entry.part_of_speech.unwrap_or_default(),
                translation: entry.translation.unwrap_or_default(),
                example: entry.example,
                notes: entry.notes,
                original_surface: surface,
            };
            self.words.insert(base.clone(), record.clone());

            // Index the inflected surface key too: `springer_verb` is
            // reachable as `springer`, not only under its base form.
            let stem = id
                .to_lowercase()
                .split('_')
                .next()
                .unwrap_or_default()
                .to_string();
            if !stem.is_empty() && stem != base {
                self.words.insert(stem, record);
            }
        }
        Ok(())
    }

    pub fn phrases(&self) -> &LexicalIndex {
        &self.phrases
    }

    pub fn words(&self) -> &LexicalIndex {
        &self.words
    }

    /// Exact phrase lookup on the lowercased key.
    pub fn lookup_phrase(&self, key: &str) -> Option<&[SenseRecord]> {
        self.phrases.get(&key.to_lowercase())
    }

    /// Exact word lookup on the lowercased key.
    pub fn lookup_word(&self, key: &str) -> Option<&[SenseRecord]> {
        self.words.get(&key.to_lowercase())
    }

    /// Word keys usable for candidate generation: lowercase letters and
    /// the Scandinavian vowels only, nothing that could carry regex
    /// metacharacters or multi-token content.
    pub fn known_word_keys(&self) -> Vec<&str> {
        self.words
            .keys()
            .filter(|key| {
                !key.is_empty()
                    && key
                        .chars()
                        .all(|ch| ch.is_ascii_lowercase() || matches!(ch, 'å' | 'ä' | 'ö'))
            })
            .collect()
    }
}

fn parse_mapping(json: &str, which: &'static str) -> Result<Vec<(String, Value)>, LoadError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(map) = value else {
        return Err(LoadError::NotAMapping(which));
    };
    Ok(map.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lexicon() -> Lexicon {
        let phrases = r#"{
            "ga_pa_1": {"phrase": "gå på", "type": "partikelverb", "translation": "to attend"},
            "broken": {"translation": "no phrase field"}
        }"#;
        let words = r#"{
            "springa_verb": {"base_word": "springa", "type": "verb", "translation": "to run"},
            "viktig_adj": {"base_word": "viktig", "translation": "important"},
            "bad": {"translation": "missing base_word"}
        }"#;
        Lexicon::load(phrases, words).expect("sample lexicon loads")
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let lexicon = sample_lexicon();
        assert_eq!(lexicon.phrases().len(), 1);
        assert!(lexicon.lookup_word("bad").is_none());
    }

    #[test]
    fn non_mapping_payload_is_a_load_error() {
        let err = Lexicon::load("[1, 2, 3]", "{}").unwrap_err();
        assert!(matches!(err, LoadError::NotAMapping("phrase")));
    }

    #[test]
    fn invalid_json_is_a_load_error() {
        let err = Lexicon::load("{", "{}").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn word_is_indexed_under_base_and_stripped_key() {
        let words = r#"{
            "springer_verb": {"base_word": "springa", "translation": "to run"}
        }"#;
        let lexicon = Lexicon::load("{}", words).expect("loads");
        assert!(lexicon.lookup_word("springa").is_some());
        // The suffix tag is stripped from the source identifier.
        let inflected = lexicon.lookup_word("springer").expect("inflected key");
        assert_eq!(inflected[0].base_form, "springa");
    }

    #[test]
    fn homonyms_keep_load_order() {
        let words = r#"{
            "fil_noun_1": {"base_word": "fil", "translation": "file"},
            "fil_noun_2": {"base_word": "fil", "translation": "sour milk"}
        }"#;
        let lexicon = Lexicon::load("{}", words).expect("loads");
        let senses = lexicon.lookup_word("fil").expect("fil present");
        assert_eq!(senses.len(), 2);
        let translations: Vec<_> = senses.iter().map(|s| s.translation.as_str()).collect();
        assert!(translations.contains(&"file"));
        assert!(translations.contains(&"sour milk"));
    }

    #[test]
    fn known_word_keys_filters_to_plain_lowercase() {
        let words = r#"{
            "springa_verb": {"base_word": "springa"},
            "mixed": {"base_word": "två-ord"},
            "caps": {"base_word": "Drottning"}
        }"#;
        let lexicon = Lexicon::load("{}", words).expect("loads");
        let keys = lexicon.known_word_keys();
        assert!(keys.contains(&"springa"));
        assert!(keys.contains(&"drottning"));
        assert!(!keys.iter().any(|k| k.contains('-')));
    }

    #[test]
    fn lookup_is_case_insensitive_via_normalization() {
        let lexicon = sample_lexicon();
        assert!(lexicon.lookup_word("SPRINGA").is_some());
        assert!(lexicon.lookup_phrase("GÅ PÅ").is_some());
    }
}
