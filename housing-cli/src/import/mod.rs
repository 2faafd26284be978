//! Bulk spreadsheet import
//!
//! An import reads one uploaded workbook, validates its header, then walks
//! the data rows one at a time. Each row is decoded, checked, resolved and
//! stored on its own: a bad row is reported and skipped, and rows stored
//! before or after it stay stored. Only a file that cannot be read as the
//! expected sheet fails the whole request.

pub mod decoder;
pub mod layout;
mod orchestrator;
mod reference;
mod report;
mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use orchestrator::Importer;
pub use reference::{ReferenceIndex, Resolution};
pub use report::{CommunityImported, ImportOutcome, ImportReport, PropertyImported, RowError};
pub use store::RecordStore;

/// File extensions accepted for upload
pub const SPREADSHEET_EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

/// Which record type a sheet holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Community,
    Property,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Community => write!(f, "community"),
            EntityKind::Property => write!(f, "property"),
        }
    }
}

/// Failure of a whole import request. No rows are processed once one of
/// these is raised.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Only Excel files (.xlsx, .xls) are supported")]
    UnsupportedFile,
    #[error("Failed to parse Excel file: {0}")]
    Unreadable(String),
    #[error("Failed to parse Excel file: no readable content")]
    Empty,
    #[error("Unexpected header in column {column}: expected '{expected}', found '{found}'")]
    HeaderMismatch {
        column: usize,
        expected: String,
        found: String,
    },
    #[error("Failed to load existing communities: {0:#}")]
    Store(anyhow::Error),
}

impl ImportError {
    /// Whether the uploaded file itself is at fault
    pub fn is_structural(&self) -> bool {
        !matches!(self, ImportError::Store(_))
    }
}

/// Reject uploads whose name does not carry a spreadsheet extension
pub fn check_extension(file_name: &str) -> Result<(), ImportError> {
    let lower = file_name.to_lowercase();
    if SPREADSHEET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        Ok(())
    } else {
        Err(ImportError::UnsupportedFile)
    }
}
