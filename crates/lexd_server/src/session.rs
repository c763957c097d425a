//! The per-connection request handler.

use crate::error::ServerResult;
use crate::log::{RecordLog, SessionEvent};
use crate::protocol::{parse_request, Command, Request, RequestError, Response};
use lexd_core::{DictionaryStore, StoreError, WriteOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, warn};

/// One connection's request loop.
///
/// A session reads request lines until end-of-stream, an idle timeout, or
/// an I/O failure; each line produces exactly one response line. The store
/// is borrowed (shared), never owned — the session holds no table state of
/// its own, and all validation happens here before a request reaches the
/// store.
///
/// The reader/writer pair is generic so tests can drive a session over an
/// in-memory duplex stream instead of a socket.
pub struct Session {
    client: u64,
    store: Arc<DictionaryStore>,
    log: Arc<dyn RecordLog>,
    idle_timeout: Option<Duration>,
}

impl Session {
    /// Creates a session for an accepted connection.
    #[must_use]
    pub fn new(
        client: u64,
        store: Arc<DictionaryStore>,
        log: Arc<dyn RecordLog>,
        idle_timeout: Option<Duration>,
    ) -> Self {
        Self {
            client,
            store,
            log,
            idle_timeout,
        }
    }

    /// Drives the session until the connection ends.
    ///
    /// The closure event is recorded on every exit path.
    ///
    /// # Errors
    ///
    /// Returns the stream I/O error that ended the session, if any.
    /// End-of-stream and idle timeout are normal endings, not errors.
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> ServerResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let result = self.serve(&mut reader, &mut writer).await;
        self.log.record(SessionEvent::Closed {
            client: self.client,
        });
        result
    }

    async fn serve<R, W>(&self, reader: &mut R, writer: &mut W) -> ServerResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        loop {
            line.clear();
            let bytes = match self.idle_timeout {
                Some(limit) => match timeout(limit, reader.read_line(&mut line)).await {
                    Ok(read) => read?,
                    Err(_) => {
                        debug!(client = self.client, "idle timeout, closing connection");
                        return Ok(());
                    }
                },
                None => reader.read_line(&mut line).await?,
            };
            if bytes == 0 {
                return Ok(());
            }

            let response = self.handle_line(line.trim_end_matches(['\r', '\n'])).await;
            writer.write_all(response.to_string().as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    /// Turns one request line into its response, recording the event.
    async fn handle_line(&self, line: &str) -> Response {
        let request = match parse_request(line) {
            Ok(request) => request,
            Err(RequestError::Malformed) => {
                self.reject("malformed request");
                return Response::InvalidRequest;
            }
            Err(RequestError::UnknownCommand(name)) => {
                debug!(client = self.client, command = %name, "unknown command");
                self.reject("unknown command");
                return Response::UnknownCommand;
            }
        };

        // Client-visible validation, before any store call.
        if request.word.is_empty() {
            self.reject("empty word");
            return Response::EmptyWord;
        }
        if request.command.takes_definitions() && request.payload.is_empty() {
            self.reject("empty definitions");
            return Response::EmptyDefinitions;
        }

        match self.dispatch(&request).await {
            Ok(response) => {
                self.log.record(SessionEvent::Operation {
                    client: self.client,
                    command: request.command,
                    word: request.word.clone(),
                    ok: response.is_success(),
                });
                response
            }
            // A payload like ";;" passes the emptiness check but yields no
            // usable definitions.
            Err(StoreError::Codec(_)) => {
                self.reject("empty definitions");
                Response::EmptyDefinitions
            }
            Err(err) => {
                warn!(client = self.client, error = %err, "store operation failed");
                self.log.record(SessionEvent::Operation {
                    client: self.client,
                    command: request.command,
                    word: request.word.clone(),
                    ok: false,
                });
                Response::ServerError
            }
        }
    }

    async fn dispatch(&self, request: &Request) -> Result<Response, StoreError> {
        let response = match request.command {
            Command::Add => match self.store.add(&request.word, &request.payload).await? {
                WriteOutcome::AlreadyExists => Response::AlreadyExists,
                _ => Response::Updated,
            },
            Command::Search => match self.store.search(&request.word).await? {
                Some(definitions) => Response::Definitions(definitions),
                None => Response::NotFound,
            },
            Command::Update => match self.store.update(&request.word, &request.payload).await? {
                WriteOutcome::NotFound => Response::CannotUpdateMissing,
                _ => Response::Updated,
            },
            Command::Delete => match self.store.delete(&request.word).await? {
                WriteOutcome::NotFound => Response::CannotDeleteMissing,
                _ => Response::Updated,
            },
        };
        Ok(response)
    }

    fn reject(&self, reason: &'static str) {
        self.log.record(SessionEvent::Rejected {
            client: self.client,
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::MemoryLog;
    use tempfile::tempdir;
    use tokio::io::{BufReader, DuplexStream};
    use tokio::task::JoinHandle;

    struct Harness {
        stream: BufReader<DuplexStream>,
        log: Arc<MemoryLog>,
        handle: JoinHandle<ServerResult<()>>,
        _dir: tempfile::TempDir,
    }

    fn start_session(idle_timeout: Option<Duration>) -> Harness {
        let dir = tempdir().unwrap();
        let store = Arc::new(DictionaryStore::open(&dir.path().join("dict.csv")).unwrap());
        let log = Arc::new(MemoryLog::new());

        let (client_side, server_side) = tokio::io::duplex(1024);
        let (read_half, write_half) = tokio::io::split(server_side);

        let session = Session::new(0, store, Arc::clone(&log) as Arc<dyn RecordLog>, idle_timeout);
        let handle =
            tokio::spawn(async move { session.run(BufReader::new(read_half), write_half).await });

        Harness {
            stream: BufReader::new(client_side),
            log,
            handle,
            _dir: dir,
        }
    }

    async fn roundtrip(stream: &mut BufReader<DuplexStream>, line: &str) -> String {
        stream.get_mut().write_all(line.as_bytes()).await.unwrap();
        stream.get_mut().write_all(b"\n").await.unwrap();

        let mut response = String::new();
        stream.read_line(&mut response).await.unwrap();
        response.trim_end().to_string()
    }

    #[tokio::test]
    async fn full_command_flow() {
        let mut harness = start_session(None);
        let stream = &mut harness.stream;

        assert_eq!(
            roundtrip(stream, "add>cat>a feline").await,
            "Dictionary successfully updated!"
        );
        assert_eq!(roundtrip(stream, "search>cat> ").await, "a feline");
        assert_eq!(
            roundtrip(stream, "add>cat>another").await,
            "Word already exists."
        );
        assert_eq!(
            roundtrip(stream, "update>cat>a pet;a feline").await,
            "Dictionary successfully updated!"
        );
        assert_eq!(roundtrip(stream, "search>cat> ").await, "a pet;a feline");
        assert_eq!(
            roundtrip(stream, "delete>cat> ").await,
            "Dictionary successfully updated!"
        );
        assert_eq!(roundtrip(stream, "search>cat> ").await, "Word does not exist.");
        assert_eq!(
            roundtrip(stream, "update>cat>anything").await,
            "Word does not exist. A non-existent word cannot be updated."
        );
        assert_eq!(
            roundtrip(stream, "delete>cat> ").await,
            "Word does not exist. A non-existent word cannot be deleted."
        );
    }

    #[tokio::test]
    async fn malformed_line_keeps_connection_usable() {
        let mut harness = start_session(None);
        let stream = &mut harness.stream;

        assert_eq!(
            roundtrip(stream, "this is not a request").await,
            "Invalid request. Expected: command>word>definitions."
        );
        assert_eq!(
            roundtrip(stream, "add>cat>a feline").await,
            "Dictionary successfully updated!"
        );
    }

    #[tokio::test]
    async fn unknown_command_is_answered() {
        let mut harness = start_session(None);

        assert_eq!(
            roundtrip(&mut harness.stream, "frobnicate>cat> ").await,
            "Unknown command."
        );
    }

    #[tokio::test]
    async fn validation_short_circuits_before_the_store() {
        let mut harness = start_session(None);
        let stream = &mut harness.stream;

        assert_eq!(roundtrip(stream, "add>> ").await, "Word cannot be empty.");
        assert_eq!(
            roundtrip(stream, "add>cat>").await,
            "Definitions cannot be empty."
        );
        assert_eq!(
            roundtrip(stream, "update>cat>;;").await,
            "Definitions cannot be empty."
        );

        let entries = harness.log.entries();
        assert!(entries
            .iter()
            .all(|entry| entry.contains("request rejected")));
    }

    #[tokio::test]
    async fn operations_and_closure_are_recorded() {
        let mut harness = start_session(None);

        roundtrip(&mut harness.stream, "add>cat>a feline").await;
        roundtrip(&mut harness.stream, "search>dog> ").await;

        drop(harness.stream);
        harness.handle.await.unwrap().unwrap();

        let entries = harness.log.entries();
        assert_eq!(entries[0], "Client 0 to ADD: cat -> SUCCESS");
        assert_eq!(entries[1], "Client 0 to SEARCH: dog -> ERROR");
        assert_eq!(entries[2], "Connection with client 0 is now closed.");
    }

    #[tokio::test]
    async fn idle_timeout_closes_the_session() {
        let mut harness = start_session(Some(Duration::from_millis(50)));

        // Send nothing; the server closes its end once the timeout fires.
        let mut response = String::new();
        let bytes = harness.stream.read_line(&mut response).await.unwrap();
        assert_eq!(bytes, 0);

        harness.handle.await.unwrap().unwrap();
        let entries = harness.log.entries();
        assert_eq!(entries.last().unwrap(), "Connection with client 0 is now closed.");
    }
}
