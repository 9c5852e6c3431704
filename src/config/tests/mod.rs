use std::path::PathBuf;

use crate::config::{ConfigError, SelectionConfig, SweepConfig};
use crate::sampling::{SamplingStrategy, SelectionSpec};

fn sample_config() -> SweepConfig {
    SweepConfig {
        base_fst_path: PathBuf::from("/data/5MW/Main.fst"),
        output_dir: PathBuf::from("/data/out"),
        num_cases: 10,
        distribution: SamplingStrategy::LatinHypercube,
        seed: Some(42),
        parameters: vec![
            SelectionConfig {
                file_type: "ElastoDyn".into(),
                param_name: "TipRad".into(),
                spec: SelectionSpec::FloatRange { start: 60.0, end: 66.0, steps: 3 },
            },
            SelectionConfig {
                file_type: "Main".into(),
                param_name: "Echo".into(),
                spec: SelectionSpec::BoolVary,
            },
            SelectionConfig {
                file_type: "AeroDyn".into(),
                param_name: "WakeMod".into(),
                spec: SelectionSpec::Options { values: vec!["BEMT".into(), "DBEMT".into()] },
            },
        ],
    }
}

#[test]
fn test_json_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sweep.json");

    let config = sample_config();
    config.save(&path).expect("Failed to save config");

    let raw = std::fs::read_to_string(&path).expect("Failed to read saved config");
    assert!(raw.contains("\"distribution\": \"latin_hypercube\""));
    assert!(raw.contains("\"kind\": \"float_range\""));
    assert!(raw.contains("\"file_type\": \"ElastoDyn\""));

    let loaded = SweepConfig::load(&path).expect("Failed to load config");
    assert_eq!(loaded, config);
}

#[test]
fn test_toml_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sweep.toml");

    let config = sample_config();
    config.save(&path).expect("Failed to save config");
    let loaded = SweepConfig::load(&path).expect("Failed to load config");
    assert_eq!(loaded, config);
}

#[test]
fn test_toml_accepts_handwritten_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sweep.toml");
    std::fs::write(
        &path,
        r#"
base_fst_path = "Main.fst"
output_dir = "cases"
num_cases = 4

[[parameters]]
file_type = "ElastoDyn"
param_name = "NumBl"
kind = "int_list"
values = [2, 3]
"#,
    )
    .expect("Failed to write config");

    let loaded = SweepConfig::load(&path).expect("Failed to load config");
    assert_eq!(loaded.distribution, SamplingStrategy::Uniform);
    assert_eq!(loaded.seed, None);
    assert_eq!(loaded.parameters[0].spec, SelectionSpec::IntList { values: vec![2, 3] });
}

#[test]
fn test_validation_errors() {
    let mut config = sample_config();
    config.num_cases = 0;
    assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

    let mut config = sample_config();
    config.base_fst_path = PathBuf::new();
    assert!(matches!(config.validate(), Err(ConfigError::NoRootFile)));

    let mut config = sample_config();
    config.parameters[0].spec = SelectionSpec::FloatRange { start: 1.0, end: 2.0, steps: 0 };
    match config.validate() {
        Err(ConfigError::ValidationError(message)) => assert!(message.contains("ElastoDyn/TipRad")),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_grid_config_ignores_case_count() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = sample_config();
    config.distribution = SamplingStrategy::GridSearch;
    config.num_cases = 0;
    assert!(config.validate().is_ok());

    let path = dir.path().join("grid.json");
    config.save(&path).expect("Failed to save config");
    let loaded = SweepConfig::load(&path).expect("Grid config with no case count should load");
    assert_eq!(loaded.num_cases, 0);
    assert_eq!(loaded.distribution, SamplingStrategy::GridSearch);
}

#[test]
fn test_load_missing_file() {
    let result = SweepConfig::load(std::path::Path::new("/definitely/not/here.json"));
    assert!(matches!(result, Err(ConfigError::FileReadError(_))));
}
