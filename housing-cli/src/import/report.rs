//! Per-request import outcome

use serde::{Deserialize, Serialize};

/// A row that was skipped, with its 1-based row number as seen in the sheet
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Row {row}: {message}")]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl RowError {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        RowError {
            row,
            message: message.into(),
        }
    }
}

/// Summary of a stored community row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityImported {
    pub id: i64,
    pub name: String,
}

/// Summary of a stored property row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyImported {
    pub id: i64,
    pub area: f64,
    pub price: f64,
}

/// Aggregated result of one import request.
///
/// `imported` always equals `details.len()`. `errors` and `warnings` are
/// left out of the serialized form when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport<D> {
    pub success: bool,
    pub imported: usize,
    pub details: Vec<D>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<D> Default for ImportReport<D> {
    fn default() -> Self {
        ImportReport {
            success: true,
            imported: 0,
            details: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl<D> ImportReport<D> {
    pub fn record_success(&mut self, detail: D) {
        self.details.push(detail);
        self.imported = self.details.len();
    }

    pub fn record_error(&mut self, error: RowError) {
        log::warn!("Import skipped {}", error);
        self.errors.push(error.to_string());
    }

    pub fn record_warning(&mut self, row: usize, message: impl AsRef<str>) {
        self.warnings.push(format!("Row {}: {}", row, message.as_ref()));
    }
}

/// Report of an import of either kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ImportOutcome {
    Communities(ImportReport<CommunityImported>),
    Properties(ImportReport<PropertyImported>),
}

impl ImportOutcome {
    pub fn imported(&self) -> usize {
        match self {
            ImportOutcome::Communities(report) => report.imported,
            ImportOutcome::Properties(report) => report.imported,
        }
    }

    pub fn errors(&self) -> &[String] {
        match self {
            ImportOutcome::Communities(report) => &report.errors,
            ImportOutcome::Properties(report) => &report.errors,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            ImportOutcome::Communities(report) => &report.warnings,
            ImportOutcome::Properties(report) => &report.warnings,
        }
    }
}
