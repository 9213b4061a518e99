//! glossweave — lexical annotation for graded reading.
//!
//! Scans prose for occurrences of entries from a phrase dictionary and
//! a word dictionary, wraps each in a non-overlapping annotation span,
//! and resolves a clicked span back to its dictionary senses. The host
//! UI owns presentation (tooltips, dismissal) entirely; this crate owns
//! the matching, overlap arbitration, markup protection, and lookup
//! fallback chain.
//!
//! ```no_run
//! use glossweave::Lexicon;
//!
//! let lexicon = Lexicon::load_from_files("phrases.json", "dictionary.json")?;
//! let html = glossweave::process("Jag springer till skolan.", &lexicon);
//! let senses = lexicon.resolve_word("skolan");
//! # Ok::<(), glossweave::LoadError>(())
//! ```

mod error;
mod lexicon;
mod normalize;
mod patterns;
mod phrase;
mod pipeline;
mod resolve;
mod shield;
mod word;

pub use error::LoadError;
pub use lexicon::{LexicalIndex, Lexicon, SenseRecord};
pub use normalize::normalize;
pub use phrase::{AnnotationSpan, SpanKind, annotate_phrases};
pub use pipeline::{annotate, process, render_html};
pub use shield::Shield;
pub use word::annotate_words;
