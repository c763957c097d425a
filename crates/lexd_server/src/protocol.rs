//! The line-oriented request/response protocol.
//!
//! Requests arrive as `command>word>payload` lines; every request is
//! answered with exactly one newline-terminated response line. The payload
//! carries the semicolon-joined definitions for `add` and `update`; for
//! `search` and `delete` it is conventionally a single space and ignored.

use lexd_codec::DEFINITION_DELIMITER;
use std::fmt;
use thiserror::Error;

/// Separates the three request fields on the wire.
pub const REQUEST_DELIMITER: char = '>';

/// A dictionary command name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Insert a new word.
    Add,
    /// Look up a word's definitions.
    Search,
    /// Replace an existing word's definitions.
    Update,
    /// Remove a word.
    Delete,
}

impl Command {
    /// Parses a command name as it appears on the wire.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "add" => Some(Self::Add),
            "search" => Some(Self::Search),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Returns true for commands whose payload carries definitions.
    #[must_use]
    pub fn takes_definitions(self) -> bool {
        matches!(self, Self::Add | Self::Update)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "ADD",
            Self::Search => "SEARCH",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The dispatched command.
    pub command: Command,
    /// The word field, exactly as received (normalization happens in the
    /// store).
    pub word: String,
    /// The payload field (raw semicolon-joined definitions).
    pub payload: String,
}

/// Why a request line could not be turned into a [`Request`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The line did not split into exactly three fields.
    #[error("malformed request line")]
    Malformed,

    /// The command field named no known command.
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
}

/// Parses one request line (without its trailing newline).
///
/// The line must split into exactly three `>`-delimited fields; anything
/// else is [`RequestError::Malformed`]. A well-formed line with an
/// unrecognized command field is [`RequestError::UnknownCommand`] — the
/// two cases get distinct client-visible responses.
///
/// # Errors
///
/// Returns a [`RequestError`] as described above.
pub fn parse_request(line: &str) -> Result<Request, RequestError> {
    let fields: Vec<&str> = line.split(REQUEST_DELIMITER).collect();
    let [command, word, payload] = fields[..] else {
        return Err(RequestError::Malformed);
    };

    let command =
        Command::parse(command).ok_or_else(|| RequestError::UnknownCommand(command.to_owned()))?;

    Ok(Request {
        command,
        word: word.to_owned(),
        payload: payload.to_owned(),
    })
}

/// A response line, rendered through `Display`.
///
/// The variants map one-to-one onto the client-visible outcome strings; no
/// variant renders with an embedded newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// A mutating operation completed and the table was persisted.
    Updated,
    /// `add` found the word already present.
    AlreadyExists,
    /// `search` found no such word.
    NotFound,
    /// `update` found no such word.
    CannotUpdateMissing,
    /// `delete` found no such word.
    CannotDeleteMissing,
    /// `search` hit: the definitions, joined in stored order.
    Definitions(Vec<String>),
    /// The word field was empty.
    EmptyWord,
    /// The payload carried no usable definitions for `add`/`update`.
    EmptyDefinitions,
    /// The request line was malformed.
    InvalidRequest,
    /// The command field named no known command.
    UnknownCommand,
    /// The operation failed server-side; nothing was confirmed persisted.
    ServerError,
}

impl Response {
    /// Returns true for the outcomes logged with a success marker.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Updated | Self::Definitions(_))
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated => f.write_str("Dictionary successfully updated!"),
            Self::AlreadyExists => f.write_str("Word already exists."),
            Self::NotFound => f.write_str("Word does not exist."),
            Self::CannotUpdateMissing => {
                f.write_str("Word does not exist. A non-existent word cannot be updated.")
            }
            Self::CannotDeleteMissing => {
                f.write_str("Word does not exist. A non-existent word cannot be deleted.")
            }
            Self::Definitions(definitions) => {
                let mut first = true;
                for definition in definitions {
                    if !first {
                        write!(f, "{DEFINITION_DELIMITER}")?;
                    }
                    f.write_str(definition)?;
                    first = false;
                }
                Ok(())
            }
            Self::EmptyWord => f.write_str("Word cannot be empty."),
            Self::EmptyDefinitions => f.write_str("Definitions cannot be empty."),
            Self::InvalidRequest => {
                f.write_str("Invalid request. Expected: command>word>definitions.")
            }
            Self::UnknownCommand => f.write_str("Unknown command."),
            Self::ServerError => f.write_str("Server error. The dictionary is unavailable."),
        }
    }
}
