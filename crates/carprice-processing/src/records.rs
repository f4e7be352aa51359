//! Batch ingestion: JSON car records to a polars [`DataFrame`].
//!
//! Only the top level of a batch is validated here. Individual cells are
//! carried over as faithfully as their column allows and are left for the
//! cleaning stages to judge.

use crate::error::{ProcessingError, Result};
use crate::types::{ColumnKind, RawCarRecord};
use crate::utils::{json_to_f64, json_to_text};
use polars::prelude::*;
use serde_json::Value;
use tracing::debug;

/// Validate that `value` is a non-empty array of JSON objects.
///
/// # Errors
///
/// Returns [`ProcessingError::InvalidInput`] if the value is not an array, the
/// array is empty, or any element is not an object.
pub fn parse_batch(value: &Value) -> Result<Vec<RawCarRecord>> {
    let Value::Array(items) = value else {
        return Err(ProcessingError::InvalidInput(
            "cars must be a non-empty list of records".to_string(),
        ));
    };

    let records: Vec<RawCarRecord> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(map) => Ok(map.clone()),
            _ => Err(ProcessingError::InvalidInput(format!(
                "record {} is not a mapping of attributes",
                idx
            ))),
        })
        .collect::<Result<_>>()?;

    ensure_non_empty(&records)?;
    Ok(records)
}

/// Reject an empty batch.
pub fn ensure_non_empty<T>(records: &[T]) -> Result<()> {
    if records.is_empty() {
        return Err(ProcessingError::InvalidInput(
            "cars must be a non-empty list of records".to_string(),
        ));
    }
    Ok(())
}

/// Build a [`DataFrame`] with one row per record.
///
/// Columns appear in first-seen key order. A record that lacks a key gets a
/// null in that column.
pub fn records_to_frame(records: &[RawCarRecord]) -> Result<DataFrame> {
    let mut names: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !names.contains(&key.as_str()) {
                names.push(key.as_str());
            }
        }
    }

    let columns = names
        .iter()
        .map(|name| {
            let cells: Vec<Option<&Value>> = records
                .iter()
                .map(|record| record.get(*name).filter(|v| !v.is_null()))
                .collect();
            build_column(name, &cells)
        })
        .collect::<Vec<Column>>();

    debug!(
        "Built batch of {} records with {} columns",
        records.len(),
        columns.len()
    );

    let mut df = DataFrame::new(columns)?;
    if df.width() == 0 {
        // Records without any attribute still count as rows.
        df = DataFrame::empty_with_height(records.len());
    }
    Ok(df)
}

fn build_column(name: &str, cells: &[Option<&Value>]) -> Column {
    let all_numbers = cells.iter().flatten().all(|v| v.is_number());
    let all_bools = cells.iter().flatten().all(|v| v.is_boolean());
    let has_values = cells.iter().any(|c| c.is_some());

    let series = match ColumnKind::of(name) {
        ColumnKind::Numerical | ColumnKind::Passthrough if all_numbers => {
            let values: Vec<Option<f64>> = cells.iter().map(|c| c.and_then(json_to_f64)).collect();
            Series::new(name.into(), values)
        }
        ColumnKind::Passthrough if all_bools && has_values => {
            let values: Vec<Option<bool>> = cells.iter().map(|c| c.and_then(Value::as_bool)).collect();
            Series::new(name.into(), values)
        }
        _ => {
            let values: Vec<Option<String>> = cells.iter().map(|c| c.and_then(json_to_text)).collect();
            Series::new(name.into(), values)
        }
    };

    series.into_column()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_batch_accepts_objects() {
        let records = parse_batch(&json!([{"Make": "Ford"}, {}])).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_batch_rejects_bad_shapes() {
        for value in [
            json!([]),
            json!({"Make": "Ford"}),
            json!("Ford"),
            json!(null),
            json!([{"Make": "Ford"}, 42]),
        ] {
            let err = parse_batch(&value).unwrap_err();
            assert!(err.is_invalid_input(), "{value} should be rejected");
        }
    }

    #[test]
    fn test_column_order_and_missing_keys() {
        let records = parse_batch(&json!([
            {"Make": "Toyota", "Year": 2018},
            {"Mileage": 100, "Make": "Ford"},
        ]))
        .unwrap();

        let df = records_to_frame(&records).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(names, vec!["Make", "Year", "Mileage"]);
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Year").unwrap().null_count(), 1);
        assert_eq!(df.column("Mileage").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_column_typing() {
        let records = parse_batch(&json!([
            {"Model": 360, "Year": "2018", "Mileage": 45000, "Price": 9000, "Certified": true, "Notes": [1]},
            {"Model": "Civic", "Year": 2017, "Mileage": null, "Price": 8500.5, "Certified": false, "Notes": "ok"},
        ]))
        .unwrap();

        let df = records_to_frame(&records).unwrap();

        assert_eq!(df.column("Model").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Year").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Mileage").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Price").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Certified").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("Notes").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_records_without_attributes_keep_height() {
        let records = parse_batch(&json!([{}, {}, {}])).unwrap();
        let df = records_to_frame(&records).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 0);
    }
}
