//! Spreadsheet I/O: reading uploaded workbooks and writing templates/exports

pub mod cells;
mod reader;
mod writer;

pub use reader::read_first_sheet;
pub use writer::{write_community_export, write_property_export, write_template};

/// MIME type for `.xlsx` responses
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
