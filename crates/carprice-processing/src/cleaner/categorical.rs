//! Categorical cleanup: free text to a canonical vocabulary entry.

use super::fuzzy::best_match;
use crate::config::NormalizerConfig;
use crate::error::Result;
use crate::types::{CATEGORICAL_COLUMNS, ColumnSummary};
use crate::vocabulary::{allowed_values, literal_correction};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::debug;

static NON_LETTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z\s]").expect("Invalid regex: non-letters"));

/// Outcome of cleaning one categorical cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    /// Nothing usable was left after sanitizing.
    Absent,
    /// Already a canonical entry after sanitizing.
    Exact(String),
    /// Rewritten by a literal correction rule.
    Corrected(String),
    /// Fuzzy-matched to a different canonical entry.
    Matched(String),
    /// No entry was close enough; replaced by the fallback category.
    Fallback(String),
}

impl CategoryOutcome {
    /// The cleaned value, `None` when absent.
    pub fn into_value(self) -> Option<String> {
        match self {
            Self::Absent => None,
            Self::Exact(v) | Self::Corrected(v) | Self::Matched(v) | Self::Fallback(v) => Some(v),
        }
    }
}

/// Trim, strip everything but letters and whitespace, then title-case.
///
/// Returns `None` when nothing is left.
pub fn sanitize_category(raw: &str) -> Option<String> {
    let stripped = NON_LETTERS.replace_all(raw.trim(), "");
    let titled = title_case(&stripped);
    if titled.is_empty() { None } else { Some(titled) }
}

/// Upper-case the first letter of each word and lower-case the rest.
///
/// A letter starts a word when the character before it is not a letter.
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut previous_is_letter = false;

    for c in value.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}

/// Clean one categorical cell and report how it was resolved.
pub fn resolve_category(
    column: &str,
    raw: Option<&str>,
    threshold: f64,
    fallback: &str,
) -> CategoryOutcome {
    let Some(value) = raw.and_then(sanitize_category) else {
        return CategoryOutcome::Absent;
    };

    let (value, corrected) = match literal_correction(column, &value) {
        Some(replacement) => (replacement.to_string(), true),
        None => (value, false),
    };

    let vocabulary = allowed_values(column).unwrap_or(&[]);
    match best_match(&value, vocabulary, threshold) {
        Some(canonical) if corrected => CategoryOutcome::Corrected(canonical.to_string()),
        Some(canonical) if canonical == value => CategoryOutcome::Exact(value),
        Some(canonical) => CategoryOutcome::Matched(canonical.to_string()),
        None => CategoryOutcome::Fallback(fallback.to_string()),
    }
}

/// Clean one categorical cell with the default threshold and fallback.
///
/// # Example
///
/// ```rust,ignore
/// use carprice_processing::clean_category_value;
///
/// assert_eq!(clean_category_value("Make", Some(" toyotta ")), Some("Toyota".to_string()));
/// assert_eq!(clean_category_value("Model", Some("cclass")), Some("C-Class".to_string()));
/// assert_eq!(clean_category_value("Make", Some("1234")), None);
/// ```
pub fn clean_category_value(column: &str, raw: Option<&str>) -> Option<String> {
    let config = NormalizerConfig::default();
    resolve_category(
        column,
        raw,
        config.match_threshold,
        &config.fallback_category,
    )
    .into_value()
}

/// Clean every vocabulary column present in the batch.
///
/// Non-text columns are cast to text first, so a numeric `Model` column is
/// sanitized like any other free text.
pub(crate) fn clean_categorical_columns(
    df: DataFrame,
    config: &NormalizerConfig,
) -> Result<(DataFrame, Vec<ColumnSummary>)> {
    let mut df = df;
    let mut summaries = Vec::new();

    for column in CATEGORICAL_COLUMNS {
        let Ok(col) = df.column(column) else {
            continue;
        };

        let series = col.as_materialized_series();
        let text = if series.dtype() == &DataType::String {
            series.clone()
        } else {
            series.cast(&DataType::String)?
        };

        let mut summary = ColumnSummary::new(column);
        let mut cleaned_values: Vec<Option<String>> = Vec::with_capacity(text.len());

        for opt_val in text.str()?.into_iter() {
            let outcome = resolve_category(
                column,
                opt_val,
                config.match_threshold,
                &config.fallback_category,
            );
            match &outcome {
                CategoryOutcome::Absent if opt_val.is_some() => summary.nulled += 1,
                CategoryOutcome::Corrected(_) => summary.corrected += 1,
                CategoryOutcome::Matched(_) => summary.fuzzy_matched += 1,
                CategoryOutcome::Fallback(_) => summary.fallback += 1,
                _ => {}
            }
            cleaned_values.push(outcome.into_value());
        }

        debug!(
            "Cleaned '{}': {} corrected, {} fuzzy-matched, {} fallback, {} blanked",
            column, summary.corrected, summary.fuzzy_matched, summary.fallback, summary.nulled
        );

        let cleaned_series = Series::new(column.into(), cleaned_values);
        df.replace(column, cleaned_series)?;
        summaries.push(summary);
    }

    Ok((df, summaries))
}
