//! The fixed category vocabulary the price model was trained on.
//!
//! Entries are ordered: when two candidates are equally similar to a value,
//! the one listed first wins.

use crate::types::{FUEL_TYPE, MAKE, MODEL, TRANSMISSION};

/// Allowed values per categorical column.
pub const ALLOWED_CATEGORIES: [(&str, &[&str]); 4] = [
    (MAKE, &["Toyota", "Ford", "Honda", "Mercedes", "BMW"]),
    (MODEL, &["Civic", "Corolla", "Focus", "C-Class", "360I"]),
    (FUEL_TYPE, &["Hybrid", "Diesel", "Petrol", "Electric"]),
    (TRANSMISSION, &["Automatic", "Manual"]),
];

/// Exact substitutions applied after title-casing and before fuzzy matching.
///
/// Title-casing turns "C-Class" into "Cclass" and "360i" into "I", so these
/// restore the canonical spelling that fuzzy matching cannot reach.
pub const LITERAL_CORRECTIONS: [(&str, &[(&str, &str)]); 2] = [
    (MODEL, &[("Cclass", "C-Class"), ("I", "360I")]),
    (MAKE, &[("Bmw", "BMW")]),
];

/// Allowed values for a column, or `None` if the column has no vocabulary.
pub fn allowed_values(column: &str) -> Option<&'static [&'static str]> {
    ALLOWED_CATEGORIES
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, values)| *values)
}

/// Literal correction for a cleaned value in a column, if one applies.
pub fn literal_correction(column: &str, value: &str) -> Option<&'static str> {
    LITERAL_CORRECTIONS
        .iter()
        .find(|(name, _)| *name == column)
        .and_then(|(_, rules)| rules.iter().find(|(from, _)| *from == value))
        .map(|(_, to)| *to)
}
