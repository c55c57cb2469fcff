//! Storage error types
//!
//! File I/O and identifier exhaustion fail a store operation. Malformed
//! lines are never errors; they are skipped by the reader.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading the store file failed
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Creating the data directory or appending a line failed
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The highest stored identifier has no successor
    #[error("no identifier left after {max_id} in {}", path.display())]
    IdsExhausted { path: PathBuf, max_id: u64 },
}

impl StorageError {
    pub fn read_failed(path: &Path, source: io::Error) -> Self {
        Self::ReadFailed {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn write_failed(path: &Path, source: io::Error) -> Self {
        Self::WriteFailed {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the store file involved in the failure
    pub fn path(&self) -> &Path {
        match self {
            Self::ReadFailed { path, .. }
            | Self::WriteFailed { path, .. }
            | Self::IdsExhausted { path, .. } => path,
        }
    }
}
