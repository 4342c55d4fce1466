//! PredLab Runner — configuration, loading, orchestration, aggregation.
//!
//! This crate builds on `predlab-core` to provide:
//! - TOML engine configuration with validation
//! - Prediction-table loading from CSV
//! - End-to-end runs with sequential or parallel pair scans
//! - Trade aggregation (totals, win rate, per-policy breakdown)
//! - Submission CSV, JSON artifacts, run manifest and text report

pub mod artifacts;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod manifest;
pub mod metrics;
pub mod report;
pub mod runner;

pub use artifacts::{ArtifactManager, ArtifactPaths};
pub use config::{ConfigError, EngineConfig, InputConfig, ScanMode};
pub use data_loader::{load_prediction_rows, read_prediction_rows, write_prediction_rows, LoadError};
pub use export::{SubmissionRecord, SUBMISSION_COLUMNS};
pub use manifest::{RunManifest, SCHEMA_VERSION};
pub use metrics::{summarize, PolicyBreakdown, TradeSummary};
pub use report::render_report;
pub use runner::{run_engine, run_from_path, EngineRun, PolicyTrades, RunError};
