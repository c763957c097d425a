//! # lexd Core
//!
//! The shared dictionary store engine.
//!
//! This crate owns the persisted table: the backing file, the advisory
//! process lock on it, and the critical section that makes concurrent
//! mutations from independently scheduled connections safe.
//!
//! Every operation reloads the table from disk as its first step; mutating
//! operations persist the whole table as their last step before releasing
//! exclusive access. That reload-mutate-flush sequence is the unit that is
//! serialized, keyed on the store (and therefore the file), never on any
//! per-connection state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lexd_core::{DictionaryStore, WriteOutcome};
//! use std::path::Path;
//!
//! let store = DictionaryStore::open(Path::new("dictionary.csv"))?;
//! match store.add("cat", "a feline;a pet").await? {
//!     WriteOutcome::Updated => println!("added"),
//!     WriteOutcome::AlreadyExists => println!("duplicate"),
//!     WriteOutcome::NotFound => unreachable!("add never reports NotFound"),
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod store;

pub use error::{StoreError, StoreResult};
pub use store::{DictionaryStore, WriteOutcome};
