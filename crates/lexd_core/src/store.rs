//! The shared dictionary store.

use crate::error::{StoreError, StoreResult};
use fs2::FileExt;
use lexd_codec::{parse, render, split_definitions, DictionaryTable};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Outcome of a store operation on the persisted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The table was mutated and persisted before this was returned.
    Updated,
    /// `add` found the word already present; nothing was mutated or written.
    AlreadyExists,
    /// `update` or `delete` found no such word; nothing was mutated or
    /// written.
    NotFound,
}

/// The shared, file-backed word → definitions table.
///
/// One `DictionaryStore` exists per backing file for the process lifetime;
/// every connection handler borrows it through an `Arc`. The store holds no
/// long-lived in-memory copy of the table: each operation reloads it from
/// disk, and mutating operations rewrite the file before returning.
///
/// # Concurrency
///
/// A single store-owned [`RwLock`] serializes the reload-mutate-flush
/// sequence. Mutating operations hold the write guard for the entire
/// sequence; [`search`](DictionaryStore::search) holds the read guard, so
/// concurrent searches proceed together but never interleave with a writer.
/// Locking per connection instead would not prevent two connections from
/// rewriting the file at once, which is why the lock lives here.
///
/// # Persistence
///
/// Saves are atomic: the table is rendered to a sibling temporary file,
/// synced, and renamed over the backing file, so a crash mid-save leaves
/// the previous contents intact.
#[derive(Debug)]
pub struct DictionaryStore {
    path: PathBuf,
    /// Serializes reload-mutate-flush across all connections.
    table_lock: RwLock<()>,
    /// Advisory lock marking this process as the file's owner.
    _lock_file: std::fs::File,
}

impl DictionaryStore {
    /// Opens the store for the given backing file.
    ///
    /// A missing file is created empty, so a fresh server starts with an
    /// empty table; an existing file is left untouched. An exclusive
    /// advisory lock is taken on a `<file>.lock` sibling and held until the
    /// store is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::FileLocked`] if another process owns the file,
    /// or [`StoreError::Io`] if the file or lock file cannot be created.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(path)?;
            info!(path = %path.display(), "created empty dictionary file");
        }

        let lock_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(sibling_path(path, ".lock"))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(StoreError::FileLocked);
        }

        Ok(Self {
            path: path.to_path_buf(),
            table_lock: RwLock::new(()),
            _lock_file: lock_file,
        })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds a word with definitions derived from `raw_definitions`.
    ///
    /// Returns [`WriteOutcome::AlreadyExists`] without touching the file if
    /// the word is present (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Codec`] if `raw_definitions` yields no usable
    /// definitions, or a persistence error if the table could not be
    /// reloaded or written.
    pub async fn add(&self, word: &str, raw_definitions: &str) -> StoreResult<WriteOutcome> {
        let _guard = self.table_lock.write().await;

        let mut table = self.load().await?;
        if table.contains(word) {
            return Ok(WriteOutcome::AlreadyExists);
        }

        table.put(word, split_definitions(raw_definitions))?;
        self.persist(&table).await?;
        Ok(WriteOutcome::Updated)
    }

    /// Looks up a word (case-insensitive) and returns its definitions in
    /// stored order, or `None` if absent. Never writes.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the table could not be reloaded.
    pub async fn search(&self, word: &str) -> StoreResult<Option<Vec<String>>> {
        let _guard = self.table_lock.read().await;

        let table = self.load().await?;
        Ok(table.get(word).map(<[String]>::to_vec))
    }

    /// Replaces a word's definitions wholesale with those derived from
    /// `raw_definitions`.
    ///
    /// Returns [`WriteOutcome::NotFound`] without touching the file if the
    /// word is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Codec`] if `raw_definitions` yields no usable
    /// definitions, or a persistence error if the table could not be
    /// reloaded or written.
    pub async fn update(&self, word: &str, raw_definitions: &str) -> StoreResult<WriteOutcome> {
        let _guard = self.table_lock.write().await;

        let mut table = self.load().await?;
        if !table.contains(word) {
            return Ok(WriteOutcome::NotFound);
        }

        table.put(word, split_definitions(raw_definitions))?;
        self.persist(&table).await?;
        Ok(WriteOutcome::Updated)
    }

    /// Removes a word from the table.
    ///
    /// Returns [`WriteOutcome::NotFound`] without touching the file if the
    /// word is absent.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the table could not be reloaded or
    /// written.
    pub async fn delete(&self, word: &str) -> StoreResult<WriteOutcome> {
        let _guard = self.table_lock.write().await;

        let mut table = self.load().await?;
        if table.remove(word).is_none() {
            return Ok(WriteOutcome::NotFound);
        }

        self.persist(&table).await?;
        Ok(WriteOutcome::Updated)
    }

    /// Reloads the table from the backing file.
    ///
    /// Callers must hold a `table_lock` guard.
    async fn load(&self) -> StoreResult<DictionaryTable> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(parse(&text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(StoreError::FileMissing {
                path: self.path.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Atomically rewrites the backing file from `table`.
    ///
    /// Write-then-rename: the rendered table lands in `<file>.tmp`, is
    /// synced, and renamed over the backing file; the parent directory is
    /// then fsynced so the rename itself is durable. Callers must hold the
    /// `table_lock` write guard.
    async fn persist(&self, table: &DictionaryTable) -> StoreResult<()> {
        let tmp_path = sibling_path(&self.path, ".tmp");

        let mut tmp = tokio::fs::File::create(&tmp_path).await?;
        tmp.write_all(render(table).as_bytes()).await?;
        tmp.sync_all().await?;
        drop(tmp);

        tokio::fs::rename(&tmp_path, &self.path).await?;
        self.sync_parent_dir().await?;

        debug!(entries = table.len(), "dictionary persisted");
        Ok(())
    }

    #[cfg(unix)]
    async fn sync_parent_dir(&self) -> StoreResult<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let dir = tokio::fs::File::open(parent).await?;
        dir.sync_all().await?;
        Ok(())
    }

    #[cfg(not(unix))]
    async fn sync_parent_dir(&self) -> StoreResult<()> {
        // NTFS journaling covers metadata durability; directory fsync is a
        // Unix notion.
        Ok(())
    }
}

/// Builds `<path><suffix>` next to the backing file.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
