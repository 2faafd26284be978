//! Derived economic fields for properties
//!
//! `price_per_sqm` and `rent_ratio` are never written by callers. Every path
//! that stores a property (API create/update and spreadsheet import) goes
//! through [`derive_fields`] so the stored values always match the row's
//! current `price`, `rent` and `area`.

use serde::{Deserialize, Serialize};

/// Listing prices are entered in 万 (10,000 currency units)
pub const PRICE_UNIT: f64 = 10_000.0;

/// Values computed from price, rent and area
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedFields {
    /// Price per square metre in currency units
    pub price_per_sqm: Option<f64>,
    /// Annualized rent yield in percent
    pub rent_ratio: Option<f64>,
}

/// Compute derived fields from the input economic fields.
///
/// Missing operands yield `None` for the affected output. A present but
/// non-positive `price` or `area` yields `None` for both outputs.
pub fn derive_fields(price: Option<f64>, rent: Option<f64>, area: Option<f64>) -> DerivedFields {
    if matches!(price, Some(p) if p <= 0.0) || matches!(area, Some(a) if a <= 0.0) {
        return DerivedFields::default();
    }

    DerivedFields {
        price_per_sqm: price_per_sqm(price, area),
        rent_ratio: rent_ratio(price, rent),
    }
}

fn price_per_sqm(price: Option<f64>, area: Option<f64>) -> Option<f64> {
    match (price, area) {
        (Some(price), Some(area)) if price > 0.0 && area > 0.0 => Some(price * PRICE_UNIT / area),
        _ => None,
    }
}

fn rent_ratio(price: Option<f64>, rent: Option<f64>) -> Option<f64> {
    match (price, rent) {
        (Some(price), Some(rent)) if price > 0.0 => Some((rent * 12.0) / (price * PRICE_UNIT) * 100.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a value");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_price_per_sqm() {
        let derived = derive_fields(Some(500.0), None, Some(100.0));
        approx(derived.price_per_sqm, 50_000.0);
        assert_eq!(derived.rent_ratio, None);
    }

    #[test]
    fn test_rent_ratio() {
        let derived = derive_fields(Some(500.0), Some(5000.0), None);
        approx(derived.rent_ratio, 1.2);
        assert_eq!(derived.price_per_sqm, None);
    }

    #[test]
    fn test_zero_area_nulls_both() {
        let derived = derive_fields(Some(500.0), Some(5000.0), Some(0.0));
        assert_eq!(derived, DerivedFields::default());
    }

    #[test]
    fn test_zero_price_nulls_both() {
        let derived = derive_fields(Some(0.0), Some(5000.0), Some(100.0));
        assert_eq!(derived, DerivedFields::default());
    }

    #[test]
    fn test_negative_inputs_are_not_errors() {
        assert_eq!(derive_fields(Some(-1.0), Some(10.0), Some(50.0)), DerivedFields::default());
        assert_eq!(derive_fields(Some(300.0), Some(10.0), Some(-5.0)), DerivedFields::default());
    }

    #[test]
    fn test_missing_everything() {
        assert_eq!(derive_fields(None, None, None), DerivedFields::default());
    }

    #[test]
    fn test_template_example_values() {
        let derived = derive_fields(Some(800.0), Some(6000.0), Some(120.0));
        approx(derived.price_per_sqm, 8_000_000.0 / 120.0);
        approx(derived.rent_ratio, 0.9);
    }
}
