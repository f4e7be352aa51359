use serde::{Deserialize, Serialize};

/// A raw car record as supplied by the caller: attribute name to JSON value.
///
/// Key order is preserved, so the first record that mentions a key decides
/// where that column sits in the batch.
pub type RawCarRecord = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Column Names
// ============================================================================

pub const MAKE: &str = "Make";
pub const MODEL: &str = "Model";
pub const YEAR: &str = "Year";
pub const ENGINE_SIZE: &str = "Engine Size";
pub const MILEAGE: &str = "Mileage";
pub const FUEL_TYPE: &str = "Fuel Type";
pub const TRANSMISSION: &str = "Transmission";

/// Derived from `Year` by feature engineering.
pub const CAR_AGE: &str = "Car Age";
/// Derived from `Mileage` by feature engineering.
pub const LOG_MILEAGE: &str = "Log Mileage";

/// Columns cleaned against the category vocabulary.
pub const CATEGORICAL_COLUMNS: [&str; 4] = [MAKE, MODEL, FUEL_TYPE, TRANSMISSION];

/// Columns coerced to numbers and range-checked.
pub const NUMERICAL_COLUMNS: [&str; 3] = [YEAR, ENGINE_SIZE, MILEAGE];

/// How a column of the raw schema is treated by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Free text reconciled against the vocabulary.
    Categorical,
    /// Number checked against a domain range.
    Numerical,
    /// Any other key, passed through untouched.
    Passthrough,
}

impl ColumnKind {
    /// Classify a raw column name.
    pub fn of(column: &str) -> Self {
        if CATEGORICAL_COLUMNS.contains(&column) {
            ColumnKind::Categorical
        } else if NUMERICAL_COLUMNS.contains(&column) {
            ColumnKind::Numerical
        } else {
            ColumnKind::Passthrough
        }
    }
}

// ============================================================================
// Cleaning Summary
// ============================================================================

/// Per-column counters collected while cleaning one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Column name.
    pub column: String,
    /// Values rewritten by a literal correction rule (e.g. "Bmw" -> "BMW").
    pub corrected: usize,
    /// Values fuzzy-matched to a different canonical spelling.
    pub fuzzy_matched: usize,
    /// Values replaced by the fallback category.
    pub fallback: usize,
    /// Values that became null (empty text, uncoercible or out-of-range numbers).
    pub nulled: usize,
    /// Numeric values rejected because they could not be read as a number.
    pub uncoercible: usize,
    /// Numeric values rejected because they fell outside the domain range.
    pub out_of_range: usize,
}

impl ColumnSummary {
    /// Create an empty summary for a column.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ..Default::default()
        }
    }
}

/// What the normalizer did to one batch.
///
/// Returned by [`Normalizer::normalize_with_summary`](crate::Normalizer::normalize_with_summary)
/// for logging or for display next to the predicted prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Number of records in the batch (unchanged by cleaning).
    pub rows: usize,
    /// Per-column counters, in the order the columns were cleaned.
    pub column_summaries: Vec<ColumnSummary>,
    /// Columns added by feature engineering.
    pub derived_columns: Vec<String>,
    /// Columns removed by feature engineering.
    pub dropped_columns: Vec<String>,
}

impl CleaningSummary {
    /// Create a new empty summary for a batch of `rows` records.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// Add a column summary.
    pub fn add_column_summary(&mut self, summary: ColumnSummary) {
        self.column_summaries.push(summary);
    }

    /// Look up the counters for a column.
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.column_summaries.iter().find(|s| s.column == name)
    }

    /// Total number of cells replaced by the fallback category.
    pub fn total_fallbacks(&self) -> usize {
        self.column_summaries.iter().map(|s| s.fallback).sum()
    }

    /// Total number of cells that became null during cleaning.
    pub fn total_nulled(&self) -> usize {
        self.column_summaries.iter().map(|s| s.nulled).sum()
    }
}
