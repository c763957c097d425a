//! # lexd Server
//!
//! TCP front end for the lexd dictionary store.
//!
//! This crate provides:
//! - the line-oriented request/response protocol (`command>word>payload`)
//! - the per-connection session driver
//! - the accept loop with a bounded connection count
//! - the operational record log and a one-shot client
//!
//! # Architecture
//!
//! One session task per accepted connection. Sessions share exactly one
//! resource: the [`lexd_core::DictionaryStore`], whose internal lock
//! serializes every reload-mutate-flush sequence. Sessions never talk to
//! each other; operational events flow to an injected [`RecordLog`].
//!
//! # Example
//!
//! ```rust,ignore
//! use lexd_server::{DictServer, ServerConfig, TracingLog};
//! use lexd_core::DictionaryStore;
//! use std::{path::Path, sync::Arc};
//!
//! let store = Arc::new(DictionaryStore::open(Path::new("dictionary.csv"))?);
//! let config = ServerConfig::default().with_max_connections(32);
//! let server = DictServer::bind(config, store, Arc::new(TracingLog)).await?;
//! server.run_until_ctrl_c().await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod log;
mod protocol;
mod server;
mod session;

pub use client::request;
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use log::{MemoryLog, RecordLog, SessionEvent, TracingLog};
pub use protocol::{parse_request, Command, Request, RequestError, Response, REQUEST_DELIMITER};
pub use server::DictServer;
pub use session::Session;
