//! Error types for codec operations.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur when building table entries.
///
/// Parsing never returns these: malformed file lines are skipped rather
/// than rejected. They surface when callers construct entries directly,
/// e.g. from a client-supplied payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The word is empty after normalization.
    #[error("word is empty")]
    EmptyWord,

    /// The definitions list is empty after splitting.
    #[error("no definitions for word {word:?}")]
    EmptyDefinitions {
        /// The word the entry was built for.
        word: String,
    },
}
