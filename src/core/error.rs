//! Error types for the duplicate scan
//!
//! Per-file failures (`Read`, `Move`) are recoverable and get collected into
//! the run outcome. Everything else aborts the run.

use std::io;
use std::path::{Path, PathBuf};

/// Errors produced while scanning, classifying and relocating files
#[derive(Debug, thiserror::Error)]
pub enum DedupError {
    /// A candidate file could not be opened or read while hashing.
    #[error("{}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Bad run-wide input, detected before any file is touched.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A duplicate could not be moved into quarantine.
    #[error("{source}")]
    Move {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The quarantine directory could not be created.
    #[error("cannot create quarantine directory {}: {source}", .path.display())]
    Quarantine {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The audit report could not be created or written.
    #[error("cannot write report {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DedupError {
    pub fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn moving(path: &Path, source: io::Error) -> Self {
        Self::Move {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. }
            | Self::Move { path, .. }
            | Self::Quarantine { path, .. }
            | Self::Report { path, .. } => Some(path),
            Self::InvalidConfiguration(_) => None,
        }
    }
}

pub type DedupResult<T> = Result<T, DedupError>;
