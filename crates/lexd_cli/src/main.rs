//! lexd CLI
//!
//! Command-line front ends for the lexd dictionary store.
//!
//! # Commands
//!
//! - `serve` - Run the dictionary server
//! - `request` - Send a single request to a running server

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use lexd_core::DictionaryStore;
use lexd_server::{DictServer, ServerConfig, ServerError, TracingLog, REQUEST_DELIMITER};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DICTIONARY: &str = "dictionary.csv";
const MIN_PORT: u16 = 1024;

/// lexd dictionary server and client.
#[derive(Parser)]
#[command(name = "lexd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dictionary server
    Serve {
        /// Port to listen on (1024-65535; out-of-range values fall back
        /// to the default)
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Dictionary file (non-.csv paths fall back to the default)
        #[arg(short, long, default_value = DEFAULT_DICTIONARY)]
        file: PathBuf,

        /// Maximum concurrently served connections
        #[arg(long, default_value_t = 64)]
        max_connections: usize,

        /// Seconds a connection may sit idle before it is closed
        /// (0 disables the timeout)
        #[arg(long, default_value_t = 300)]
        idle_timeout_secs: u64,
    },

    /// Send a single request to a running server
    Request {
        /// Server host
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Server port
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Command name: add, search, update or delete
        command: String,

        /// The word to operate on
        word: String,

        /// Semicolon-separated definitions (required for add and update)
        definitions: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            port,
            file,
            max_connections,
            idle_timeout_secs,
        } => serve(port, file, max_connections, idle_timeout_secs).await,
        Commands::Request {
            host,
            port,
            command,
            word,
            definitions,
        } => send_request(&host, port, &command, &word, definitions.as_deref()).await,
    }
}

async fn serve(
    port: u16,
    file: PathBuf,
    max_connections: usize,
    idle_timeout_secs: u64,
) -> Result<()> {
    let port = effective_port(port);
    let file = effective_file(file);

    let store = Arc::new(DictionaryStore::open(&file)?);

    let config = ServerConfig::new(SocketAddr::from(([0, 0, 0, 0], port)))
        .with_max_connections(max_connections);
    let config = match idle_timeout_secs {
        0 => config.without_idle_timeout(),
        secs => config.with_idle_timeout(Duration::from_secs(secs)),
    };

    let server = DictServer::bind(config, store, Arc::new(TracingLog)).await?;
    server.run_until_ctrl_c().await?;
    Ok(())
}

async fn send_request(
    host: &str,
    port: u16,
    command: &str,
    word: &str,
    definitions: Option<&str>,
) -> Result<()> {
    let line = compose_request(command, word, definitions)?;

    match lexd_server::request(host, port, &line).await {
        Ok(response) => {
            println!("{response}");
            Ok(())
        }
        Err(ServerError::ConnectionRefused { .. }) => {
            bail!("The connection to the server has been refused.")
        }
        Err(ServerError::HostUnresolvable { .. }) => {
            bail!("The IP address of the remote host could not be determined.")
        }
        Err(_) => bail!("Failure in operating the client socket/command."),
    }
}

/// Composes the `command>word>payload` request line.
///
/// `add` and `update` require definitions; `search` and `delete` send the
/// conventional single-space payload.
fn compose_request(command: &str, word: &str, definitions: Option<&str>) -> Result<String> {
    if word.is_empty() {
        bail!("Please enter the word to operate on.");
    }

    let payload = match (command, definitions) {
        ("add" | "update", Some(defs)) if !defs.is_empty() => defs,
        ("add" | "update", _) => bail!("Please enter the word's definition(s)."),
        (_, _) => " ",
    };

    Ok(format!(
        "{command}{d}{word}{d}{payload}",
        d = REQUEST_DELIMITER
    ))
}

/// Applies the server's port fallback rule: out-of-range ports revert to
/// the default.
fn effective_port(port: u16) -> u16 {
    if port < MIN_PORT {
        warn!(port, fallback = DEFAULT_PORT, "port out of range, using default");
        DEFAULT_PORT
    } else {
        port
    }
}

/// Applies the server's file fallback rule: only `.csv` files are
/// accepted; anything else reverts to the default dictionary in the
/// working directory.
fn effective_file(file: PathBuf) -> PathBuf {
    if file.extension().is_some_and(|ext| ext == "csv") {
        file
    } else {
        warn!(
            file = %file.display(),
            fallback = DEFAULT_DICTIONARY,
            "incompatible dictionary file, using default"
        );
        Path::new(DEFAULT_DICTIONARY).to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_fallback() {
        assert_eq!(effective_port(80), DEFAULT_PORT);
        assert_eq!(effective_port(1024), 1024);
        assert_eq!(effective_port(8888), 8888);
    }

    #[test]
    fn file_fallback() {
        assert_eq!(
            effective_file(PathBuf::from("words.csv")),
            PathBuf::from("words.csv")
        );
        assert_eq!(
            effective_file(PathBuf::from("words.txt")),
            PathBuf::from(DEFAULT_DICTIONARY)
        );
        assert_eq!(
            effective_file(PathBuf::from("no-extension")),
            PathBuf::from(DEFAULT_DICTIONARY)
        );
    }

    #[test]
    fn composes_request_lines() {
        assert_eq!(
            compose_request("add", "cat", Some("a feline;a pet")).unwrap(),
            "add>cat>a feline;a pet"
        );
        assert_eq!(
            compose_request("search", "cat", None).unwrap(),
            "search>cat> "
        );
    }

    #[test]
    fn add_requires_definitions() {
        assert!(compose_request("add", "cat", None).is_err());
        assert!(compose_request("update", "cat", Some("")).is_err());
        assert!(compose_request("delete", "cat", None).is_ok());
    }

    #[test]
    fn empty_word_is_rejected() {
        assert!(compose_request("search", "", None).is_err());
    }
}
