//! Run manifest — provenance for a set of artifacts.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, ScanMode};
use crate::runner::EngineRun;

pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    /// BLAKE3 of the input table bytes; `None` for in-memory inputs.
    pub dataset_hash: Option<String>,
    pub config_hash: String,
    pub scan_mode: ScanMode,
    pub fee_rate: f64,
    pub row_count: usize,
    pub pair_count: usize,
    pub trade_count: usize,
    /// Trade count per policy name.
    pub trades_by_policy: BTreeMap<String, usize>,
}

impl RunManifest {
    pub fn new(run: &EngineRun, config: &EngineConfig, dataset_hash: Option<String>) -> Result<Self> {
        Ok(Self {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            dataset_hash,
            config_hash: config.config_hash()?,
            scan_mode: config.scan_mode,
            fee_rate: config.fee_rate,
            row_count: run.row_count,
            pair_count: run.pair_count,
            trade_count: run.trades.len(),
            trades_by_policy: run
                .policy_trades
                .iter()
                .map(|p| (p.policy.as_str().to_string(), p.trades.len()))
                .collect(),
        })
    }
}

/// BLAKE3 of a file's contents.
pub fn hash_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read {} for hashing", path.display()))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    let json =
        serde_json::to_string_pretty(manifest).context("failed to serialize run manifest")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write manifest to {}", path.display()))
}

/// Read a manifest, rejecting schema versions newer than this build.
pub fn read_manifest(path: &Path) -> Result<RunManifest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let manifest: RunManifest =
        serde_json::from_str(&json).context("failed to deserialize run manifest")?;
    if manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}
