//! Loosely-typed cell coercion
//!
//! Spreadsheet cells arrive as whatever the author typed. These helpers map
//! them onto the field types the importer needs, turning anything that does
//! not fit into `None` rather than an error.

use calamine::Data;
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// String form of a cell, trimmed. `None` for empty and error cells.
///
/// Whole-number floats render without a fractional part, so a cell typed as
/// `101` reads back as `"101"` rather than `"101.0"`.
pub fn cell_string(cell: Option<&Data>) -> Option<String> {
    let s = match cell? {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::DateTime(_) | Data::Error(_) | Data::Empty => return None,
    };

    if s.is_empty() { None } else { Some(s) }
}

/// Trimmed text, empty string when absent
pub fn cell_text(row: &[Data], col: usize) -> String {
    cell_string(row.get(col)).unwrap_or_default()
}

/// Non-negative integer. Only cells whose string form is all decimal digits
/// are accepted; no partial parse.
pub fn cell_int(row: &[Data], col: usize) -> Option<i64> {
    let s = cell_string(row.get(col))?;
    if s.chars().all(|c| c.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// Finite number, from a numeric cell or a string that parses as one
pub fn cell_float(row: &[Data], col: usize) -> Option<f64> {
    let value = match row.get(col)? {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    value.is_finite().then_some(value)
}

/// Calendar date written as `YYYY-MM-DD`, or a native date cell
pub fn cell_date(row: &[Data], col: usize) -> Option<NaiveDate> {
    match row.get(col)? {
        Data::DateTime(dt) => dt.as_datetime().map(|dt| dt.date()),
        cell => parse_date(&cell_string(Some(cell))?),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// A row is blank when its first cell is empty. Whitespace counts as
/// content here so that a row with a blank-looking name is reported rather
/// than silently dropped.
pub fn is_blank(row: &[Data]) -> bool {
    match row.first() {
        None | Some(Data::Empty) => true,
        Some(Data::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_cell_string_whole_floats() {
        assert_eq!(cell_string(Some(&Data::Float(101.0))), Some("101".to_string()));
        assert_eq!(cell_string(Some(&Data::Float(2.5))), Some("2.5".to_string()));
        assert_eq!(cell_string(Some(&s("  南  "))), Some("南".to_string()));
        assert_eq!(cell_string(Some(&s("   "))), None);
        assert_eq!(cell_string(Some(&Data::Empty)), None);
        assert_eq!(cell_string(None), None);
    }

    #[test]
    fn test_cell_int_digits_only() {
        let row = vec![
            Data::Float(2015.0),
            s("2015"),
            s("2015年"),
            Data::Int(-3),
            Data::Float(8.5),
            s(" 7 "),
            Data::Empty,
        ];
        assert_eq!(cell_int(&row, 0), Some(2015));
        assert_eq!(cell_int(&row, 1), Some(2015));
        assert_eq!(cell_int(&row, 2), None);
        assert_eq!(cell_int(&row, 3), None);
        assert_eq!(cell_int(&row, 4), None);
        assert_eq!(cell_int(&row, 5), Some(7));
        assert_eq!(cell_int(&row, 6), None);
        assert_eq!(cell_int(&row, 99), None);
    }

    #[test]
    fn test_cell_float() {
        let row = vec![
            Data::Float(120.5),
            Data::Int(800),
            s(" 95.5 "),
            s("about 90"),
            s("NaN"),
            Data::Bool(true),
        ];
        assert_eq!(cell_float(&row, 0), Some(120.5));
        assert_eq!(cell_float(&row, 1), Some(800.0));
        assert_eq!(cell_float(&row, 2), Some(95.5));
        assert_eq!(cell_float(&row, 3), None);
        assert_eq!(cell_float(&row, 4), None);
        assert_eq!(cell_float(&row, 5), None);
    }

    #[test]
    fn test_cell_date_exact_format() {
        let row = vec![s("2024-01-15"), s("2024/01/15"), s("2024-1-5"), s("2024-02-30"), s("")];
        assert_eq!(cell_date(&row, 0), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(cell_date(&row, 1), None);
        assert_eq!(cell_date(&row, 2), None);
        assert_eq!(cell_date(&row, 3), None);
        assert_eq!(cell_date(&row, 4), None);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&[]));
        assert!(is_blank(&[Data::Empty, s("x")]));
        assert!(is_blank(&[s(""), s("x")]));
        assert!(!is_blank(&[s("  "), s("x")]));
        assert!(!is_blank(&[s("示例小区")]));
    }
}
