//! Append-only record store
//!
//! One store owns one line file. Reads load the whole file and keep every
//! well-formed line in file order. Creation computes the next identifier and
//! appends the new line as a single critical section.
//!
//! # Locking
//!
//! Each store holds a `RwLock`. `load_all` takes the read side, so any
//! number of listings run together. `append` takes the write side for the
//! whole scan-then-write sequence; two creations can never observe the same
//! maximum identifier.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, info, warn};

use super::errors::{StorageError, StorageResult};
use super::record::{encode_line, split_line, PurchaseOrder, Record, RecordKind, Supplier};

/// Line-file store for records of type `R`.
pub struct RecordStore<R: Record> {
    /// Path to the store file
    path: PathBuf,
    /// Guards the file; the protected state lives on disk
    lock: RwLock<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordStore<R> {
    /// Creates a store backed by `<data_dir>/<kind file name>`.
    ///
    /// Nothing is touched on disk until the first append.
    pub fn new(data_dir: &Path) -> Self {
        Self::at_path(data_dir.join(R::KIND.file_name()))
    }

    /// Creates a store backed by an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
            _record: PhantomData,
        }
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every well-formed record, oldest first.
    ///
    /// Blank, short, and otherwise malformed lines are skipped. A store
    /// file that does not exist yet is an empty store.
    pub fn load_all(&self) -> StorageResult<Vec<R>> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        let contents = self.read_contents()?;

        let mut records = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            match split_line(line, R::KIND) {
                Some(fields) => records.push(R::from_fields(&fields)),
                None if !line.trim().is_empty() => {
                    debug!(
                        store = R::KIND.label(),
                        line = index + 1,
                        "skipping malformed record line"
                    );
                }
                None => {}
            }
        }

        Ok(records)
    }

    /// Returns the identifier the next appended record would receive.
    pub fn next_id(&self) -> StorageResult<u64> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        let contents = self.read_contents()?;
        next_id_in::<R>(&self.path, &contents)
    }

    /// Appends a new record and returns its assigned identifier.
    ///
    /// Creates the data directory and the store file when absent. The line
    /// is written with a single append; if the write fails the file is cut
    /// back to its previous length, so a record is either fully present or
    /// absent.
    pub fn append(&self, draft: &R::Draft) -> StorageResult<u64> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);

        let contents = self.read_contents()?;
        let id = next_id_in::<R>(&self.path, &contents)?;

        let mut line = encode_line(id, &R::draft_fields(draft));
        if !contents.is_empty() && !contents.ends_with('\n') {
            line.insert(0, '\n');
        }

        self.append_line(&line)?;
        info!(store = R::KIND.label(), id, "record appended");

        Ok(id)
    }

    /// Reads the store file as text. Invalid UTF-8 is replaced, not fatal.
    fn read_contents(&self) -> StorageResult<String> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(StorageError::read_failed(&self.path, e)),
        }
    }

    fn append_line(&self, line: &str) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| StorageError::write_failed(&self.path, e))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StorageError::write_failed(&self.path, e))?;

        let previous_len = file
            .metadata()
            .map_err(|e| StorageError::write_failed(&self.path, e))?
            .len();

        if let Err(e) = file.write_all(line.as_bytes()).and_then(|()| file.sync_data()) {
            if let Err(truncate_err) = file.set_len(previous_len) {
                warn!(
                    store = R::KIND.label(),
                    error = %truncate_err,
                    "could not roll back partial append"
                );
            }
            return Err(StorageError::write_failed(&self.path, e));
        }

        Ok(())
    }
}

/// Highest identifier among the well-formed lines of `contents`, plus one.
///
/// A line whose identifier is not an integer is skipped; it neither fails
/// the scan nor takes part in the maximum. A maximum of `u64::MAX` has no
/// successor and fails with [`StorageError::IdsExhausted`].
fn next_id_in<R: Record>(path: &Path, contents: &str) -> StorageResult<u64> {
    let mut max_id = 0u64;
    for line in contents.lines() {
        let Some(fields) = split_line(line, R::KIND) else {
            continue;
        };
        match fields[0].trim().parse::<u64>() {
            Ok(id) => max_id = max_id.max(id),
            Err(_) => warn!(
                store = R::KIND.label(),
                id = fields[0],
                "ignoring record with non-numeric identifier"
            ),
        }
    }
    max_id
        .checked_add(1)
        .ok_or_else(|| StorageError::IdsExhausted {
            path: path.to_path_buf(),
            max_id,
        })
}

/// The supplier and purchase-order stores of one data directory.
pub struct Stores {
    pub suppliers: RecordStore<Supplier>,
    pub orders: RecordStore<PurchaseOrder>,
}

impl Stores {
    /// Opens both stores under `data_dir`.
    pub fn open(data_dir: &Path) -> Self {
        Self {
            suppliers: RecordStore::new(data_dir),
            orders: RecordStore::new(data_dir),
        }
    }

    /// Returns the file path backing `kind`.
    pub fn path(&self, kind: RecordKind) -> &Path {
        match kind {
            RecordKind::Supplier => self.suppliers.path(),
            RecordKind::PurchaseOrder => self.orders.path(),
        }
    }
}
