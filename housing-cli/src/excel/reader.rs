//! Read an uploaded workbook into positional rows

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::import::ImportError;

/// Read every row of the first worksheet.
///
/// Rows are anchored at cell A1: if the used range starts further in, the
/// leading rows and columns are padded with empty cells so positions match
/// what a person sees in the sheet.
pub fn read_first_sheet(bytes: Vec<u8>) -> Result<Vec<Vec<Data>>, ImportError> {
    if bytes.is_empty() {
        return Err(ImportError::Empty);
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ImportError::Unreadable(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::Empty)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::Unreadable(format!("sheet '{}': {}", sheet_name, e)))?;

    let Some((start_row, start_col)) = range.start() else {
        return Err(ImportError::Empty);
    };

    let mut rows: Vec<Vec<Data>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = vec![Data::Empty; start_col as usize];
        cells.extend(row.iter().cloned());
        rows.push(cells);
    }

    log::debug!(
        "Read {} rows from sheet '{}' (used range starts at row {}, col {})",
        rows.len(),
        sheet_name,
        start_row,
        start_col
    );

    Ok(rows)
}
