//! Feature engineering: reshape the cleaned batch into the model's schema.
//!
//! `Year` becomes `Car Age` and `Mileage` becomes `Log Mileage`. The source
//! columns are dropped and the derived ones are appended at the end, so the
//! output schema differs from the input schema.

use crate::error::Result;
use crate::types::{CAR_AGE, LOG_MILEAGE, MILEAGE, YEAR};
use polars::prelude::*;
use tracing::debug;

/// Columns added and removed by [`engineer_features`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureChanges {
    pub derived: Vec<String>,
    pub dropped: Vec<String>,
}

/// `current_year - year`, null when the year is null or the difference does
/// not fit in an `i32`.
pub fn car_age(year: Option<i32>, current_year: i32) -> Option<i32> {
    year.and_then(|y| current_year.checked_sub(y))
}

/// `ln(1 + mileage)`, null when the mileage is null.
pub fn log_mileage(mileage: Option<f64>) -> Option<f64> {
    mileage.map(f64::ln_1p)
}

/// Derive `Car Age` and `Log Mileage` and drop their source columns.
///
/// Each transform only runs if its source column is present.
pub fn engineer_features(df: DataFrame, current_year: i32) -> Result<(DataFrame, FeatureChanges)> {
    let mut df = df;
    let mut changes = FeatureChanges::default();

    if let Ok(col) = df.column(YEAR) {
        let years = col.as_materialized_series().cast(&DataType::Int32)?;
        let ages: Vec<Option<i32>> = years
            .i32()?
            .into_iter()
            .map(|year| car_age(year, current_year))
            .collect();

        df.with_column(Series::new(CAR_AGE.into(), ages))?;
        df.drop_in_place(YEAR)?;
        changes.derived.push(CAR_AGE.to_string());
        changes.dropped.push(YEAR.to_string());
        debug!("Derived '{}' from '{}'", CAR_AGE, YEAR);
    }

    if let Ok(col) = df.column(MILEAGE) {
        let mileages = col.as_materialized_series().cast(&DataType::Float64)?;
        let logs: Vec<Option<f64>> = mileages.f64()?.into_iter().map(log_mileage).collect();

        df.with_column(Series::new(LOG_MILEAGE.into(), logs))?;
        df.drop_in_place(MILEAGE)?;
        changes.derived.push(LOG_MILEAGE.to_string());
        changes.dropped.push(MILEAGE.to_string());
        debug!("Derived '{}' from '{}'", LOG_MILEAGE, MILEAGE);
    }

    Ok((df, changes))
}
