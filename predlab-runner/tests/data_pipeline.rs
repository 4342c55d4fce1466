//! Loading prediction tables from disk and running them end to end.

use std::fs::File;
use std::path::{Path, PathBuf};

use predlab_core::domain::PredictionRow;
use predlab_core::synthetic::generate_rows;
use predlab_runner::{
    run_engine, run_from_path, write_prediction_rows, EngineConfig, InputConfig, LoadError,
    RunError,
};

fn write_table(dir: &Path, rows: &[PredictionRow]) -> PathBuf {
    let path = dir.join("predictions.csv");
    let file = File::create(&path).unwrap();
    write_prediction_rows(file, rows).unwrap();
    path
}

#[test]
fn file_run_matches_in_memory_run() {
    let dir = tempfile::tempdir().unwrap();
    let rows = generate_rows(4, 400, 9);
    let path = write_table(dir.path(), &rows);

    let config = EngineConfig::default();
    let from_file = run_from_path(&path, &config).unwrap();
    let in_memory = run_engine(rows, &config);

    assert_eq!(from_file.row_count, 1600);
    assert_eq!(from_file.pair_count, 4);
    assert_eq!(from_file.trades, in_memory.trades);
    assert_eq!(from_file.summary, in_memory.summary);
}

#[test]
fn skip_rows_shrinks_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(dir.path(), &generate_rows(2, 50, 3));

    let config = EngineConfig {
        input: InputConfig { skip_rows: 30 },
        ..EngineConfig::default()
    };
    let run = run_from_path(&path, &config).unwrap();
    assert_eq!(run.row_count, 70);
}

#[test]
fn skipping_everything_yields_empty_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(dir.path(), &generate_rows(1, 10, 3));

    let config = EngineConfig {
        input: InputConfig { skip_rows: 100 },
        ..EngineConfig::default()
    };
    let run = run_from_path(&path, &config).unwrap();
    assert_eq!(run.row_count, 0);
    assert!(run.trades.is_empty());
    assert!(run.summary.is_none());
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_from_path(&dir.path().join("absent.csv"), &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, RunError::Load(LoadError::Open { .. })));
}

#[test]
fn missing_column_is_reported_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "keys_pair,minutesSinceStart,Lpred1b\nEURUSD,0,0.1\n").unwrap();

    let err = run_from_path(&path, &EngineConfig::default()).unwrap_err();
    match err {
        RunError::Load(LoadError::MissingColumn(name)) => assert_eq!(name, "Lpred2b"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_config_fails_before_loading() {
    let config = EngineConfig {
        fee_rate: -1.0,
        ..EngineConfig::default()
    };
    let err = run_from_path(Path::new("does-not-matter.csv"), &config).unwrap_err();
    assert!(matches!(err, RunError::Config(_)));
}
