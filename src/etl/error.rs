use crate::sparkify_store::StoreError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading data files.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Malformed record in {} line {line}: {reason}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EtlError {
    pub(crate) fn malformed(path: &Path, line: usize, reason: impl Into<String>) -> Self {
        EtlError::MalformedRecord {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        EtlError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
