use serde::{Serialize, Serializer};
use std::fmt;

//==============================================================================
// Cell values
//==============================================================================

/// A soft-typed worksheet value.
///
/// `Missing` stands in for empty cells, cells outside the loaded window, failed
/// lookups and numeric domain failures alike. A `Number` is never NaN.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl CellValue {
    /// Wrap a number, mapping NaN to `Missing`
    pub fn number(value: f64) -> Self {
        if value.is_nan() {
            CellValue::Missing
        } else {
            CellValue::Number(value)
        }
    }

    /// Wrap text, mapping blank strings to `Missing`
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            CellValue::Missing
        } else {
            CellValue::Text(value)
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(CellValue::Missing, CellValue::number)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::text(value)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Missing => serializer.serialize_none(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Missing => f.write_str("-"),
        }
    }
}

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    if n != 0.0 && n.abs() < 1e-6 {
        return format!("{:e}", n);
    }
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_nan_is_missing() {
        assert_eq!(CellValue::number(f64::NAN), CellValue::Missing);
        assert_eq!(CellValue::number(2.5), CellValue::Number(2.5));
    }

    #[test]
    fn test_blank_text_is_missing() {
        assert_eq!(CellValue::text("   "), CellValue::Missing);
        assert_eq!(CellValue::text("X"), CellValue::Text("X".to_string()));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(CellValue::from(None), CellValue::Missing);
        assert_eq!(CellValue::from(Some(1.0)), CellValue::Number(1.0));
        assert_eq!(CellValue::from(Some(f64::NAN)), CellValue::Missing);
    }

    #[test]
    fn test_serialize_json() {
        let values = vec![
            CellValue::Number(1.5),
            CellValue::Text("A".to_string()),
            CellValue::Missing,
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1.5,"A",null]"#);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(2.500), "2.5");
        assert_eq!(format_number(0.123456789), "0.123457");
        assert_eq!(format_number(1e-30), "1e-30");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn test_display_missing() {
        assert_eq!(CellValue::Missing.to_string(), "-");
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
    }
}
