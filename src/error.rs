use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading a vocabulary source. Both format variants are fatal
/// and surface before any question is asked.
#[derive(Debug, Error)]
pub enum VocabError {
    #[error("invalid vocabulary data: {0}")]
    Format(String),

    #[error("unsupported vocabulary format for {0}, only .json files are supported")]
    UnsupportedFormat(String),

    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures of the progress store.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// The stored record exists but is not a list of translations.
    #[error("progress file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("progress file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Vocab(#[from] VocabError),

    #[error("input error: {0}")]
    Input(#[from] io::Error),
}
