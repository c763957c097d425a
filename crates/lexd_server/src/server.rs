//! The connection acceptor.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::log::{RecordLog, SessionEvent};
use crate::session::Session;
use lexd_core::DictionaryStore;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::select;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{info, warn};

/// The dictionary server: accepts connections and spawns one session task
/// per client.
///
/// The acceptor never blocks on a session. Concurrency is bounded by a
/// semaphore sized from [`ServerConfig::max_connections`]; once the bound
/// is reached, further connections wait in the accept queue until a
/// session ends. Sessions share the store and the record log, nothing
/// else.
pub struct DictServer {
    listener: TcpListener,
    config: ServerConfig,
    store: Arc<DictionaryStore>,
    log: Arc<dyn RecordLog>,
    connections: Arc<Semaphore>,
    next_client: AtomicU64,
}

impl DictServer {
    /// Binds the listener for the configured address.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the address cannot be bound.
    pub async fn bind(
        config: ServerConfig,
        store: Arc<DictionaryStore>,
        log: Arc<dyn RecordLog>,
    ) -> ServerResult<Self> {
        let listener = TcpListener::bind(config.bind_addr).await?;
        let connections = Arc::new(Semaphore::new(config.max_connections));

        Ok(Self {
            listener,
            config,
            store,
            log,
            connections,
            next_client: AtomicU64::new(0),
        })
    }

    /// Returns the bound address (useful when binding port 0).
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the local address cannot be read.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until the `shutdown` future completes.
    ///
    /// Accept errors are logged and the loop continues; in-flight sessions
    /// are detached tasks and finish on their own after shutdown.
    ///
    /// # Errors
    ///
    /// Currently infallible at runtime; the `Result` keeps the signature
    /// stable for callers composing with `?`.
    pub async fn run_until<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        info!(
            addr = %self.local_addr()?,
            max_connections = self.config.max_connections,
            "server listening for connections"
        );
        tokio::pin!(shutdown);

        loop {
            // Admission first: hold a free session slot before accepting.
            let permit = select! {
                _ = &mut shutdown => break,
                permit = Arc::clone(&self.connections).acquire_owned() => {
                    let Ok(permit) = permit else { break };
                    permit
                }
            };

            select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_session(stream, peer, permit),
                    Err(err) => warn!(error = %err, "failed to accept connection"),
                }
            }
        }

        info!("server shutting down");
        Ok(())
    }

    /// Runs the accept loop until ctrl-c.
    ///
    /// # Errors
    ///
    /// See [`run_until`](DictServer::run_until).
    pub async fn run_until_ctrl_c(self) -> ServerResult<()> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "failed to install ctrl-c handler");
            }
        })
        .await
    }

    fn spawn_session(&self, stream: TcpStream, peer: SocketAddr, permit: OwnedSemaphorePermit) {
        let client = self.next_client.fetch_add(1, Ordering::Relaxed);
        self.log.record(SessionEvent::Connected {
            client,
            peer: peer.to_string(),
        });

        let session = Session::new(
            client,
            Arc::clone(&self.store),
            Arc::clone(&self.log),
            self.config.idle_timeout,
        );

        tokio::spawn(async move {
            // The permit is the session's slot; dropping it re-admits one
            // waiting connection.
            let _permit = permit;
            let (reader, writer) = stream.into_split();
            if let Err(err) = session.run(BufReader::new(reader), writer).await {
                warn!(client, error = %err, "connection closed with error");
            }
        });
    }
}
