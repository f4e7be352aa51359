//! Integration tests for batch price prediction.
//!
//! These tests load the fixture artifact from disk and run raw JSON batches
//! through the full normalize → score → clamp path.

use carprice_learning::{
    PredictionError, Predictor, PredictorConfig, RegressionModel, TrainedModel,
    cached_model_count, clear_model_cache, load_cached,
};
use carprice_processing::{Normalizer, NormalizerConfig};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// Helper Functions
// ============================================================================

const REFERENCE_YEAR: i32 = 2024;

fn artifact_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/car_price_pipeline.json")
}

fn normalizer_config() -> NormalizerConfig {
    NormalizerConfig::builder()
        .reference_year(REFERENCE_YEAR)
        .build()
        .unwrap()
}

fn predictor() -> Predictor {
    let config = PredictorConfig::builder()
        .model_path(artifact_path())
        .cache_model(false)
        .normalizer(normalizer_config())
        .build()
        .unwrap();
    Predictor::from_config(config).expect("Fixture model should load")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

// ============================================================================
// End-to-End Prediction
// ============================================================================

#[test]
fn test_predict_two_cars() {
    let prices = predictor()
        .predict_json(&json!([
            {"Make": "Toyota", "Model": "Corolla", "Year": 2018, "Engine Size": 1.8,
             "Mileage": 45000, "Fuel Type": "Petrol", "Transmission": "Automatic"},
            {"Make": "Honda", "Model": "Civic", "Year": 2017, "Engine Size": 2.0,
             "Mileage": 60000, "Fuel Type": "Petrol", "Transmission": "Manual"}
        ]))
        .unwrap();

    let corolla = 15000.0
        + 2400.0 * (1.8 - 2.0) / 0.8
        - 3200.0 * (6.0 - 7.0) / 4.0
        - 1500.0 * (45001f64.ln() - 11.0) / 0.9
        + 600.0
        + 700.0;
    let civic = 15000.0
        - 3200.0 * (7.0 - 7.0) / 4.0
        - 1500.0 * (60001f64.ln() - 11.0) / 0.9
        + 300.0
        + 200.0;

    assert_eq!(prices.len(), 2);
    assert_close(prices[0], corolla);
    assert_close(prices[1], civic);
}

#[test]
fn test_messy_batch_keeps_length_and_sign() {
    let prices = predictor()
        .predict_json(&json!([
            {"Make": "toyotta", "Model": "corola", "Year": "2019", "Engine Size": "1.6",
             "Mileage": "30,000", "Fuel Type": "hybrid", "Transmission": "auto"},
            {"Make": "Tesla", "Model": "Model 3", "Year": 1800, "Engine Size": 0,
             "Mileage": -5, "Fuel Type": "Electrik", "Transmission": "Manual"},
            {"Make": "", "Model": null, "Year": null, "Engine Size": null,
             "Mileage": null, "Fuel Type": null, "Transmission": null, "Color": "Blue"}
        ]))
        .unwrap();

    assert_eq!(prices.len(), 3);
    assert!(prices.iter().all(|p| *p >= 0.0));
}

#[test]
fn test_fully_absent_record_uses_imputed_values() {
    let prices = predictor()
        .predict_json(&json!([
            {"Make": null, "Model": null, "Year": null, "Engine Size": null,
             "Mileage": null, "Fuel Type": null, "Transmission": null}
        ]))
        .unwrap();

    // Every feature takes its imputed value: scaled terms vanish and the
    // imputed categories contribute their own coefficients.
    assert_close(prices[0], 15000.0 + 600.0 + 0.0 + 0.0 + 700.0);
}

#[test]
fn test_negative_prediction_is_clamped_to_zero() {
    let prices = predictor()
        .predict_json(&json!([
            {"Make": "Ford", "Model": "Focus", "Year": 1925, "Engine Size": 1.0,
             "Mileage": 600000, "Fuel Type": "Petrol", "Transmission": "Manual"}
        ]))
        .unwrap();

    assert_eq!(prices, vec![0.0]);
}

#[test]
fn test_empty_batch_is_invalid_input() {
    let err = predictor().predict_json(&json!([])).unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(err.error_code(), "INVALID_INPUT");

    let err = predictor().predict_json(&json!([1, 2])).unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn test_batch_missing_a_feature_column_is_schema_mismatch() {
    let err = predictor()
        .predict_json(&json!([
            {"Make": "Toyota", "Model": "Corolla", "Year": 2018, "Engine Size": 1.8,
             "Fuel Type": "Petrol", "Transmission": "Automatic"}
        ]))
        .unwrap_err();

    assert!(matches!(err, PredictionError::SchemaMismatch(_)));
    assert!(err.to_string().contains("Log Mileage"));
}

// ============================================================================
// Normalized Input
// ============================================================================

#[test]
fn test_predict_normalized_skips_the_normalizer() {
    let features = df! {
        "Make" => &["BMW"],
        "Model" => &["360I"],
        "Engine Size" => &[2.0],
        "Fuel Type" => &["Diesel"],
        "Transmission" => &["Automatic"],
        "Car Age" => &[7i32],
        "Log Mileage" => &[11.0],
    }
    .unwrap();

    let prices = predictor().predict_normalized(&features).unwrap();

    assert_close(prices[0], 15000.0 + 5200.0 + 3100.0 + 400.0 + 700.0);
}

#[test]
fn test_normalized_and_raw_paths_agree() {
    let records = json!([
        {"Make": "bmw", "Model": "360i", "Year": 2020, "Engine Size": 3.0,
         "Mileage": 25000, "Fuel Type": "Diesel", "Transmission": "Automatic"}
    ]);
    let predictor = predictor();

    let raw = predictor.predict_json(&records).unwrap();

    let batch = carprice_processing::parse_batch(&records).unwrap();
    let features = Normalizer::new(normalizer_config())
        .unwrap()
        .normalize_records(&batch)
        .unwrap();
    let normalized = predictor.predict_normalized(&features).unwrap();

    assert_eq!(raw, normalized);
}

// ============================================================================
// Model Loading
// ============================================================================

#[test]
fn test_missing_artifact_is_model_not_found() {
    let config = PredictorConfig::builder()
        .model_path("/nonexistent/final_car_price_pipeline.json")
        .build()
        .unwrap();

    let err = Predictor::from_config(config).unwrap_err();
    assert!(matches!(err, PredictionError::ModelNotFound { .. }));
}

#[test]
fn test_fixture_artifact_info() {
    let model = TrainedModel::load(artifact_path()).unwrap();
    let info = model.get_info();

    assert_eq!(info.model_name, "linear_regression");
    assert_eq!(info.target_column, "Price");
    assert_eq!(
        model.feature_names(),
        vec![
            "Engine Size",
            "Car Age",
            "Log Mileage",
            "Make",
            "Model",
            "Fuel Type",
            "Transmission"
        ]
    );
    assert_eq!(info.metrics.r2, Some(0.86));
}

#[test]
fn test_model_cache() {
    let first = load_cached(artifact_path()).unwrap();
    let second = load_cached(artifact_path()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(cached_model_count() >= 1);

    clear_model_cache();

    // Holders of the old instance keep it; the next load reads the file again.
    let third = load_cached(artifact_path()).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(*first, *third);
}
