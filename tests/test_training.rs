//! Integration test: training pipeline from CSV to persisted artifact

use crop_price::error::CropPriceError;
use crop_price::schema::{FeatureSchema, TARGET_COLUMN};
use crop_price::training::{sample_record, CropPriceModel, TrainEngine, TrainingConfig};
use crop_price::utils::{DataLoader, Dataset, MissingValuePolicy};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "STATE,SOIL_TYPE,CROP,N_SOIL,P_SOIL,K_SOIL,TEMPERATURE,HUMIDITY,ph,RAINFALL,CROP_PRICE";

const STATES: [&str; 4] = ["Karnataka", "Punjab", "Kerala", "Gujarat"];
const SOILS: [&str; 4] = ["Loamy soil", "Black soil", "Red soil", "Alluvial soil"];
const CROPS: [&str; 3] = ["Rice", "Wheat", "Cotton"];

fn csv_rows(n: usize) -> String {
    let mut out = String::new();
    for i in 0..n {
        let nitrogen = 40.0 + (i * 7 % 50) as f64;
        let rainfall = 100.0 + (i * 13 % 200) as f64;
        let crop = CROPS[i % 3];
        let price = 800.0
            + nitrogen * 6.0
            + rainfall * 1.5
            + if crop == "Cotton" { 900.0 } else { 0.0 }
            + i as f64 * 0.37;
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{:.2}",
            STATES[i % 4],
            SOILS[(i / 2) % 4],
            crop,
            nitrogen,
            30 + i % 20,
            35 + i % 25,
            20.0 + (i % 15) as f64,
            60 + i % 30,
            5.5 + (i % 20) as f64 * 0.1,
            rainfall,
            price
        )
        .unwrap();
    }
    out
}

fn write_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("{}\n{}", HEADER, body)).unwrap();
    path
}

fn config_for(dir: &TempDir, data: PathBuf) -> TrainingConfig {
    TrainingConfig::new()
        .with_data_path(data)
        .with_model_path(dir.path().join("out").join("crop_price_model.json"))
        .with_n_estimators(15)
}

#[test]
fn test_run_persists_and_reloads() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(dir.path(), "crop_data.csv", &csv_rows(60));
    let config = config_for(&dir, data);

    let report = TrainEngine::new(config.clone()).run().unwrap();

    assert!(config.model_path.exists());
    assert_eq!(report.n_test, 12);
    assert_eq!(report.n_train, 48);
    assert!(report.metrics.mse.is_finite() && report.metrics.mse >= 0.0);

    let loaded = CropPriceModel::load(&config.model_path).unwrap();
    assert_eq!(loaded.n_trees(), 15);
    assert_eq!(loaded.predict_record(&sample_record()).unwrap(), report.sample_prediction);
}

#[test]
fn test_round_trip_matches_in_memory_model() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(dir.path(), "crop_data.csv", &csv_rows(40));
    let df = DataLoader::new().load_csv(&data).unwrap();
    let dataset = Dataset::from_dataframe(&df, TARGET_COLUMN, MissingValuePolicy::Reject).unwrap();

    let model = TrainEngine::new(config_for(&dir, data)).fit(&dataset).unwrap();
    let path = dir.path().join("model.json");
    model.save(&path).unwrap();
    let loaded = CropPriceModel::load(&path).unwrap();

    assert_eq!(
        model.predict_record(&sample_record()).unwrap(),
        loaded.predict_record(&sample_record()).unwrap()
    );
    assert_eq!(model.predict_dataset(&dataset).unwrap(), loaded.predict_dataset(&dataset).unwrap());
    assert_eq!(loaded.schema(), &FeatureSchema::crop_default());
}

#[test]
fn test_training_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(dir.path(), "crop_data.csv", &csv_rows(50));
    let df = DataLoader::new().load_csv(&data).unwrap();
    let dataset = Dataset::from_dataframe(&df, TARGET_COLUMN, MissingValuePolicy::Reject).unwrap();

    let engine = TrainEngine::new(config_for(&dir, data));
    let a = engine.fit(&dataset).unwrap();
    let b = engine.fit(&dataset).unwrap();

    assert_eq!(a.metadata().metrics, b.metadata().metrics);
    assert_eq!(a.predict_dataset(&dataset).unwrap(), b.predict_dataset(&dataset).unwrap());
}

#[test]
fn test_two_rows_is_enough() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(dir.path(), "crop_data.csv", &csv_rows(2));

    let report = TrainEngine::new(config_for(&dir, data)).run().unwrap();
    assert_eq!(report.n_test, 1);
    assert!(report.metrics.mse.is_finite() && report.metrics.mse >= 0.0);
}

#[test]
fn test_single_row_is_rejected() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(dir.path(), "crop_data.csv", &csv_rows(1));

    let err = TrainEngine::new(config_for(&dir, data)).run().unwrap_err();
    assert!(matches!(err, CropPriceError::InsufficientData { required: 2, actual: 1 }));
}

#[test]
fn test_quality_gate_blocks_persistence() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(dir.path(), "crop_data.csv", &csv_rows(40));
    let config = config_for(&dir, data).with_max_test_mse(0.0);

    let err = TrainEngine::new(config.clone()).run().unwrap_err();
    assert!(matches!(err, CropPriceError::QualityGate { .. }));
    assert!(!config.model_path.exists());
}

#[test]
fn test_quality_gate_passes_when_generous() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(dir.path(), "crop_data.csv", &csv_rows(40));
    let config = config_for(&dir, data).with_max_test_mse(1e12);

    TrainEngine::new(config.clone()).run().unwrap();
    assert!(config.model_path.exists());
}

#[test]
fn test_missing_values_policy() {
    let dir = TempDir::new().unwrap();
    let mut body = csv_rows(20);
    body.push_str("Goa,Red soil,Rice,,40,45,25,70,6.5,200,1500\n");
    let data = write_csv(dir.path(), "crop_data.csv", &body);

    let err = TrainEngine::new(config_for(&dir, data.clone())).run().unwrap_err();
    assert!(matches!(err, CropPriceError::DataError(ref msg) if msg.contains("N_SOIL")));

    let report = TrainEngine::new(config_for(&dir, data).with_missing_values(MissingValuePolicy::Drop))
        .run()
        .unwrap();
    assert_eq!(report.dropped_rows, 1);
    assert_eq!(report.n_train + report.n_test, 20);
}

#[test]
fn test_missing_target_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no_target.csv");
    std::fs::write(&path, "STATE,SOIL_TYPE,CROP,N_SOIL\nGoa,Red soil,Rice,50\nGoa,Red soil,Rice,60\n").unwrap();

    let err = TrainEngine::new(config_for(&dir, path)).run().unwrap_err();
    assert!(matches!(err, CropPriceError::FeatureNotFound(ref col) if col == TARGET_COLUMN));
}

#[test]
fn test_extra_numeric_column_becomes_feature() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extra.csv");
    let mut body = String::from("STATE,SOIL_TYPE,CROP,SUNSHINE,N_SOIL,CROP_PRICE\n");
    for i in 0..12 {
        writeln!(body, "Goa,Red soil,{},{},{},{}", CROPS[i % 3], i, 50 + i, 1000 + 10 * i).unwrap();
    }
    std::fs::write(&path, body).unwrap();

    let df = DataLoader::new().load_csv(&path).unwrap();
    let dataset = Dataset::from_dataframe(&df, TARGET_COLUMN, MissingValuePolicy::Reject).unwrap();
    let model = TrainEngine::new(config_for(&dir, path)).fit(&dataset).unwrap();

    assert_eq!(model.schema().numerical(), vec!["SUNSHINE", "N_SOIL"]);
    let names = &model.metadata().feature_names;
    assert_eq!(&names[names.len() - 2..], &["SUNSHINE".to_string(), "N_SOIL".to_string()]);
}

fn skewed_rows(n: usize) -> String {
    let mut out = String::new();
    for i in 0..n {
        writeln!(
            out,
            "Karnataka,Loamy soil,Rice,{},40,45,25.0,75.0,6.5,300.0,{:.1}",
            i,
            2f64.powi(i as i32)
        )
        .unwrap();
    }
    out
}

#[test]
fn test_deep_trees_reload_from_artifact() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(dir.path(), "skewed.csv", &skewed_rows(250));
    let config = config_for(&dir, data.clone()).with_n_estimators(5);

    let report = TrainEngine::new(config.clone()).run().unwrap();
    let loaded = CropPriceModel::load(&config.model_path).unwrap();

    let deepest = loaded.forest().trees().iter().map(|t| t.get_depth()).max().unwrap();
    assert!(deepest > 64, "deepest tree {}", deepest);
    assert_eq!(loaded.predict_record(&sample_record()).unwrap(), report.sample_prediction);

    let df = DataLoader::new().load_csv(&data).unwrap();
    let dataset = Dataset::from_dataframe(&df, TARGET_COLUMN, MissingValuePolicy::Reject).unwrap();
    let model = TrainEngine::new(config).fit(&dataset).unwrap();
    assert_eq!(model.predict_dataset(&dataset).unwrap(), loaded.predict_dataset(&dataset).unwrap());
}
