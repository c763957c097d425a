//! The operational record log.
//!
//! Sessions and the acceptor report their events through the [`RecordLog`]
//! trait rather than to a concrete sink, so the log is an injected
//! capability: the binary wires in [`TracingLog`], embedders and tests can
//! capture events with [`MemoryLog`]. Implementations must be internally
//! thread-safe; every session appends concurrently.

use crate::protocol::Command;
use parking_lot::Mutex;
use std::fmt;
use tracing::info;

/// An operational event reported by the acceptor or a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A connection was accepted and assigned a client number.
    Connected {
        /// The session's sequence number.
        client: u64,
        /// Peer address, as text.
        peer: String,
    },
    /// A request was dispatched to the store.
    Operation {
        /// The session's sequence number.
        client: u64,
        /// The dispatched command.
        command: Command,
        /// The word the command named.
        word: String,
        /// Whether the outcome was a success response.
        ok: bool,
    },
    /// A request was rejected before reaching the store.
    Rejected {
        /// The session's sequence number.
        client: u64,
        /// Short reason, e.g. `malformed request`.
        reason: &'static str,
    },
    /// The session ended.
    Closed {
        /// The session's sequence number.
        client: u64,
    },
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected { client, peer } => {
                write!(f, "Connected with client {client} ({peer})")
            }
            Self::Operation {
                client,
                command,
                word,
                ok,
            } => {
                let marker = if *ok { "SUCCESS" } else { "ERROR" };
                write!(f, "Client {client} to {command}: {word} -> {marker}")
            }
            Self::Rejected { client, reason } => {
                write!(f, "Client {client} request rejected: {reason}")
            }
            Self::Closed { client } => {
                write!(f, "Connection with client {client} is now closed.")
            }
        }
    }
}

/// A sink for operational events.
///
/// Appending must be safe from any number of sessions at once.
pub trait RecordLog: Send + Sync {
    /// Records one event.
    fn record(&self, event: SessionEvent);
}

/// Forwards events to `tracing` at info level.
///
/// The production sink: whatever subscriber the binary installs becomes
/// the operator-visible record of connections and operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl RecordLog for TracingLog {
    fn record(&self, event: SessionEvent) {
        info!("{event}");
    }
}

/// Collects rendered events in memory.
///
/// For tests and embedders that present the record themselves.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<String>>,
}

impl MemoryLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded lines, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

impl RecordLog for MemoryLog {
    fn record(&self, event: SessionEvent) {
        self.entries.lock().push(event.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_render_like_the_record_log() {
        let event = SessionEvent::Operation {
            client: 3,
            command: Command::Add,
            word: "cat".into(),
            ok: true,
        };
        assert_eq!(event.to_string(), "Client 3 to ADD: cat -> SUCCESS");

        let event = SessionEvent::Closed { client: 3 };
        assert_eq!(event.to_string(), "Connection with client 3 is now closed.");
    }

    #[test]
    fn memory_log_collects_in_order() {
        let log = MemoryLog::new();
        log.record(SessionEvent::Connected {
            client: 0,
            peer: "127.0.0.1:9".into(),
        });
        log.record(SessionEvent::Closed { client: 0 });

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].starts_with("Connected with client 0"));
    }
}
