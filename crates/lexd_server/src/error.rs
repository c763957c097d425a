//! Error types for the server and the one-shot client.

use std::io;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the server or the one-shot client.
///
/// Domain outcomes (word exists / does not exist) never appear here; they
/// are response text. The connect variants keep the client's transport
/// failures distinguishable for user-facing reporting.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The remote host actively refused the connection.
    #[error("connection refused by {addr}")]
    ConnectionRefused {
        /// The address the connection was attempted to.
        addr: String,
    },

    /// The remote host name could not be resolved to an address.
    #[error("could not resolve host {host:?}")]
    HostUnresolvable {
        /// The host name that failed to resolve.
        host: String,
    },

    /// The peer closed the connection before sending a response line.
    #[error("connection closed before a response was received")]
    ConnectionClosed,

    /// A stream or listener I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
