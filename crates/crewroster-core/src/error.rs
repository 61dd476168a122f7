//! Core error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while exporting a roster to iCal.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The document could not be written to disk.
    #[error("failed to write iCal export to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    /// Creates a write error for the given path.
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// A crew role code that is not one of the known codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown crew role code: {0}")]
pub struct UnknownRoleCode(pub String);
