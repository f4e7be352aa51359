//! Shared utilities for the normalization pipeline.
//!
//! Value coercion helpers used by batch ingestion and numerical cleanup.

use polars::prelude::*;
use serde_json::Value;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Characters commonly used in numeric formatting that should be stripped.
pub const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Clean a string for numeric parsing by removing formatting characters.
///
/// # Example
///
/// ```rust,ignore
/// use carprice_processing::utils::clean_numeric_string;
///
/// assert_eq!(clean_numeric_string("45,000"), "45000");
/// assert_eq!(clean_numeric_string("  $1 200 "), "1200");
/// ```
pub fn clean_numeric_string(s: &str) -> String {
    let mut result = s.trim().to_string();
    for c in NUMERIC_FORMAT_CHARS {
        result = result.replace(c, "");
    }
    result
}

/// Try to parse a string as a finite numeric value.
///
/// Handles thousands separators and currency symbols; "NaN" and "inf" are rejected.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// JSON Value Coercion
// =============================================================================

/// Read a JSON value as a finite number. Numeric strings count; booleans do not.
pub fn json_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_numeric_string(s),
        _ => None,
    }
}

/// Render a JSON value as text. `null` has no text.
pub fn json_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

// =============================================================================
// Series Coercion
// =============================================================================

/// Coerce a Series of any dtype to finite `f64` values.
///
/// Returns the values and the number of non-null cells that could not be read
/// as a number.
pub fn coerce_to_f64(series: &Series) -> PolarsResult<(Vec<Option<f64>>, usize)> {
    let mut values = Vec::with_capacity(series.len());
    let mut uncoercible = 0;

    if is_numeric_dtype(series.dtype()) {
        let float_series = series.cast(&DataType::Float64)?;
        for opt_val in float_series.f64()?.into_iter() {
            match opt_val {
                Some(v) if v.is_finite() => values.push(Some(v)),
                Some(_) => {
                    uncoercible += 1;
                    values.push(None);
                }
                None => values.push(None),
            }
        }
    } else if series.dtype() == &DataType::String {
        for opt_val in series.str()?.into_iter() {
            match opt_val {
                Some(s) => {
                    let parsed = parse_numeric_string(s);
                    if parsed.is_none() {
                        uncoercible += 1;
                    }
                    values.push(parsed);
                }
                None => values.push(None),
            }
        }
    } else {
        uncoercible = series.len() - series.null_count();
        values.resize(series.len(), None);
    }

    Ok((values, uncoercible))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_clean_numeric_string() {
        assert_eq!(clean_numeric_string("$1,234.56"), "1234.56");
        assert_eq!(clean_numeric_string("  42%  "), "42");
        assert_eq!(clean_numeric_string("1 000"), "1000");
    }

    #[test]
    fn test_parse_numeric_string() {
        assert_eq!(parse_numeric_string("42"), Some(42.0));
        assert_eq!(parse_numeric_string("45,000"), Some(45000.0));
        assert_eq!(parse_numeric_string("-100"), Some(-100.0));
        assert_eq!(parse_numeric_string(""), None);
        assert_eq!(parse_numeric_string("low"), None);
        assert_eq!(parse_numeric_string("NaN"), None);
        assert_eq!(parse_numeric_string("inf"), None);
    }

    #[test]
    fn test_json_to_f64() {
        assert_eq!(json_to_f64(&json!(2018)), Some(2018.0));
        assert_eq!(json_to_f64(&json!(1.8)), Some(1.8));
        assert_eq!(json_to_f64(&json!(" 45000 ")), Some(45000.0));
        assert_eq!(json_to_f64(&json!(true)), None);
        assert_eq!(json_to_f64(&json!(null)), None);
        assert_eq!(json_to_f64(&json!([1])), None);
    }

    #[test]
    fn test_json_to_text() {
        assert_eq!(json_to_text(&json!("Ford")), Some("Ford".to_string()));
        assert_eq!(json_to_text(&json!(360)), Some("360".to_string()));
        assert_eq!(json_to_text(&json!(false)), Some("false".to_string()));
        assert_eq!(json_to_text(&json!(null)), None);
        assert_eq!(json_to_text(&json!(["a"])), Some("[\"a\"]".to_string()));
    }

    #[test]
    fn test_coerce_numeric_series() {
        let series = Series::new("x".into(), &[Some(1i64), None, Some(3)]);
        let (values, uncoercible) = coerce_to_f64(&series).unwrap();

        assert_eq!(values, vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(uncoercible, 0);
    }

    #[test]
    fn test_coerce_float_series_rejects_nan() {
        let series = Series::new("x".into(), &[1.5f64, f64::NAN, f64::INFINITY]);
        let (values, uncoercible) = coerce_to_f64(&series).unwrap();

        assert_eq!(values, vec![Some(1.5), None, None]);
        assert_eq!(uncoercible, 2);
    }

    #[test]
    fn test_coerce_string_series() {
        let series = Series::new("x".into(), &[Some("12,000"), Some("abc"), None]);
        let (values, uncoercible) = coerce_to_f64(&series).unwrap();

        assert_eq!(values, vec![Some(12000.0), None, None]);
        assert_eq!(uncoercible, 1);
    }

    #[test]
    fn test_coerce_boolean_series() {
        let series = Series::new("x".into(), &[Some(true), None]);
        let (values, uncoercible) = coerce_to_f64(&series).unwrap();

        assert_eq!(values, vec![None, None]);
        assert_eq!(uncoercible, 1);
    }
}
