//! Error types for store operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
///
/// Domain outcomes (word already exists, word not found) are not errors;
/// they are reported through [`crate::WriteOutcome`] and `Option` return
/// values. These variants cover genuine failures only.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred while reading or writing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An entry violated the table invariants.
    #[error("codec error: {0}")]
    Codec(#[from] lexd_codec::CodecError),

    /// The backing file disappeared after the store was opened.
    ///
    /// Distinct from an empty file, which loads as an empty table.
    #[error("dictionary file missing: {path}")]
    FileMissing {
        /// Path of the missing backing file.
        path: PathBuf,
    },

    /// Another process holds the lock on the backing file.
    #[error("dictionary file locked: another process has exclusive access")]
    FileLocked,
}
