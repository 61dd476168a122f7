//! Calendar error types.

use std::io;

use chrono::NaiveDate;
use crewroster_core::ExportError;
use crewroster_providers::ProviderError;
use thiserror::Error;

/// Result type for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Errors that can occur while querying or exporting a roster.
#[derive(Debug, Error)]
pub enum CalendarError {
    /// The roster provider failed; nothing was merged.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Writing the exported calendar failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO error (export directory, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The requested range ends before it starts.
    #[error("Invalid range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

impl CalendarError {
    /// Creates an invalid range error.
    pub fn invalid_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::InvalidRange { start, end }
    }
}
