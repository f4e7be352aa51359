//! Numerical cleanup: coerce to numbers and null out implausible values.

use crate::config::NormalizerConfig;
use crate::error::Result;
use crate::types::{ColumnSummary, ENGINE_SIZE, MILEAGE, NUMERICAL_COLUMNS, YEAR};
use crate::utils::coerce_to_f64;
use polars::prelude::*;
use tracing::debug;

/// Inclusive domain range for a numerical column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRange {
    pub min: f64,
    pub max: f64,
}

impl ValidRange {
    /// Check a value against the range.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// The domain range of a numerical column under `config`.
pub fn valid_range(column: &str, config: &NormalizerConfig) -> Option<ValidRange> {
    match column {
        YEAR => Some(ValidRange {
            min: config.min_year as f64,
            max: config.current_year() as f64,
        }),
        MILEAGE => Some(ValidRange {
            min: 0.0,
            max: config.max_mileage,
        }),
        ENGINE_SIZE => Some(ValidRange {
            min: 0.0,
            max: config.max_engine_size,
        }),
        _ => None,
    }
}

/// Coerce and range-check every numerical column present in the batch.
///
/// `Year` comes out as `Int32`, truncated after the range check; the other
/// columns come out as `Float64`. The target column is never touched.
pub(crate) fn clean_numerical_columns(
    df: DataFrame,
    config: &NormalizerConfig,
) -> Result<(DataFrame, Vec<ColumnSummary>)> {
    let mut df = df;
    let mut summaries = Vec::new();

    for column in NUMERICAL_COLUMNS {
        if column == config.target_column {
            continue;
        }
        let Ok(col) = df.column(column) else {
            continue;
        };
        let Some(range) = valid_range(column, config) else {
            continue;
        };

        let (values, uncoercible) = coerce_to_f64(col.as_materialized_series())?;

        let mut summary = ColumnSummary::new(column);
        summary.uncoercible = uncoercible;

        let checked: Vec<Option<f64>> = values
            .into_iter()
            .map(|opt_val| match opt_val {
                Some(v) if range.contains(v) => Some(v),
                Some(_) => {
                    summary.out_of_range += 1;
                    None
                }
                None => None,
            })
            .collect();
        summary.nulled = summary.uncoercible + summary.out_of_range;

        debug!(
            "Cleaned '{}': {} uncoercible, {} out of range [{}, {}]",
            column, summary.uncoercible, summary.out_of_range, range.min, range.max
        );

        let cleaned_series = if column == YEAR {
            let whole: Vec<Option<i32>> = checked.iter().map(|v| v.map(|v| v as i32)).collect();
            Series::new(column.into(), whole)
        } else {
            Series::new(column.into(), checked)
        };
        df.replace(column, cleaned_series)?;
        summaries.push(summary);
    }

    Ok((df, summaries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> NormalizerConfig {
        NormalizerConfig::builder()
            .reference_year(2024)
            .build()
            .unwrap()
    }

    fn f64_values(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
        df.column(column)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_valid_range_bounds_are_inclusive() {
        let config = config();
        let year = valid_range("Year", &config).unwrap();
        assert!(year.contains(1925.0));
        assert!(year.contains(2024.0));
        assert!(!year.contains(1924.0));
        assert!(!year.contains(2025.0));
        assert!(year.contains(2018.5));
        assert!(!year.contains(2024.5));

        let mileage = valid_range("Mileage", &config).unwrap();
        assert!(mileage.contains(0.0));
        assert!(mileage.contains(600_000.0));
        assert!(!mileage.contains(-1.0));

        let engine = valid_range("Engine Size", &config).unwrap();
        assert!(engine.contains(6.0));
        assert!(!engine.contains(6.1));

        assert!(valid_range("Price", &config).is_none());
    }

    #[test]
    fn test_year_out_of_range_becomes_null() {
        let df = df! { "Year" => &[Some(2018i64), Some(1900), Some(2030), None] }.unwrap();

        let (cleaned, summaries) = clean_numerical_columns(df, &config()).unwrap();
        let years: Vec<Option<i32>> = cleaned
            .column("Year")
            .unwrap()
            .as_materialized_series()
            .i32()
            .unwrap()
            .into_iter()
            .collect();

        assert_eq!(years, vec![Some(2018), None, None, None]);
        assert_eq!(summaries[0].out_of_range, 2);
        assert_eq!(summaries[0].nulled, 2);
    }

    #[test]
    fn test_mileage_and_engine_size_ranges() {
        let df = df! {
            "Mileage" => &[45000.0, -5.0, 700_000.0, 0.0],
            "Engine Size" => &[1.8, 6.0, 7.5, -0.1],
        }
        .unwrap();

        let (cleaned, _) = clean_numerical_columns(df, &config()).unwrap();

        assert_eq!(
            f64_values(&cleaned, "Mileage"),
            vec![Some(45000.0), None, None, Some(0.0)]
        );
        assert_eq!(
            f64_values(&cleaned, "Engine Size"),
            vec![Some(1.8), Some(6.0), None, None]
        );
    }

    #[test]
    fn test_text_values_are_coerced() {
        let df = df! {
            "Mileage" => &[Some("45,000"), Some("lots"), None],
            "Year" => &[Some("2018"), Some("20x8"), Some("2018.5")],
        }
        .unwrap();

        let (cleaned, summaries) = clean_numerical_columns(df, &config()).unwrap();

        assert_eq!(
            f64_values(&cleaned, "Mileage"),
            vec![Some(45000.0), None, None]
        );
        assert_eq!(cleaned.column("Year").unwrap().dtype(), &DataType::Int32);
        assert_eq!(cleaned.column("Year").unwrap().null_count(), 1);

        let year = summaries.iter().find(|s| s.column == "Year").unwrap();
        assert_eq!(year.uncoercible, 1);
        assert_eq!(year.out_of_range, 0);
    }

    #[test]
    fn test_fractional_year_in_range_is_truncated() {
        let df = df! { "Year" => &[2020.5, 2020.0, 2024.5, 1924.9] }.unwrap();

        let (cleaned, summaries) = clean_numerical_columns(df, &config()).unwrap();
        let years: Vec<Option<i32>> = cleaned
            .column("Year")
            .unwrap()
            .as_materialized_series()
            .i32()
            .unwrap()
            .into_iter()
            .collect();

        assert_eq!(years, vec![Some(2020), Some(2020), None, None]);
        assert_eq!(summaries[0].out_of_range, 2);
    }

    #[test]
    fn test_other_columns_untouched() {
        let df = df! {
            "Price" => &[-1.0, 1e9],
            "Mileage" => &[10.0, 20.0],
        }
        .unwrap();

        let (cleaned, summaries) = clean_numerical_columns(df, &config()).unwrap();

        assert_eq!(f64_values(&cleaned, "Price"), vec![Some(-1.0), Some(1e9)]);
        assert_eq!(summaries.len(), 1);
    }
}
