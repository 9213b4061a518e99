use thiserror::Error;

/// Failures while building the lexicon. These always escalate: an engine
/// with no dictionary cannot usefully run, so no partial lexicon is kept.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Dictionary file could not be read.
    #[error("failed to read dictionary file: {0}")]
    Io(#[from] std::io::Error),

    /// Dictionary payload is not valid JSON.
    #[error("failed to parse dictionary JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Dictionary payload parsed, but is not an object mapping
    /// identifiers to entry records.
    #[error("{0} dictionary is not a mapping of identifiers to records")]
    NotAMapping(&'static str),
}

/// Failures inside an annotation pass. These never escalate past the
/// annotator: the caller always gets renderable text back.
#[derive(Error, Debug)]
pub(crate) enum AnnotationError {
    #[error("failed to build match pattern for {key:?}: {source}")]
    Pattern {
        key: String,
        #[source]
        source: regex::Error,
    },
}
