//! Table cell values.

use serde::{Deserialize, Serialize};

/// A single value of a scenario table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    /// Parse a raw text field: empty and `nan` are missing, numbers are
    /// numbers, everything else is text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(raw.to_string()),
        }
    }

    /// True for empty cells and NaN numbers.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(v) => v.is_nan(),
            Cell::Text(_) => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text rendering used for headers, index labels and CSV fields.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Number(v) if v.is_nan() => String::new(),
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_classifies_fields() {
        assert_eq!(Cell::parse(""), Cell::Empty);
        assert_eq!(Cell::parse("NaN"), Cell::Empty);
        assert_eq!(Cell::parse("2.5"), Cell::Number(2.5));
        assert_eq!(Cell::parse("-3"), Cell::Number(-3.0));
        assert_eq!(Cell::parse("b_el"), Cell::Text("b_el".into()));
    }

    #[test]
    fn missing_covers_nan() {
        assert!(Cell::Number(f64::NAN).is_missing());
        assert!(Cell::Empty.is_missing());
        assert!(!Cell::Number(0.0).is_missing());
        assert!(!Cell::Text(String::new()).is_missing());
    }

    #[test]
    fn fields_round_trip_numbers() {
        for v in [0.1, 1.0, 1e-7, 123456.789, -42.0] {
            assert_eq!(Cell::parse(&Cell::Number(v).to_field()), Cell::Number(v));
        }
    }

    #[test]
    fn infinities_are_numbers() {
        assert_eq!(Cell::Number(f64::INFINITY).to_field(), "inf");
        assert_eq!(Cell::parse("inf"), Cell::Number(f64::INFINITY));
        assert_eq!(Cell::parse("-inf"), Cell::Number(f64::NEG_INFINITY));
    }

    proptest! {
        #[test]
        fn numbers_survive_fields(v in any::<f64>().prop_filter("not NaN", |v| !v.is_nan())) {
            prop_assert_eq!(Cell::parse(&Cell::Number(v).to_field()), Cell::Number(v));
        }

        #[test]
        fn labels_stay_text(s in "[a-z][a-z0-9_]{0,15}") {
            prop_assume!(s.parse::<f64>().is_err() && !s.eq_ignore_ascii_case("nan"));
            prop_assert_eq!(Cell::parse(&s), Cell::Text(s.clone()));
        }
    }
}
