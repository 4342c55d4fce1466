//! Artifact manager for persisting run outputs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::export::{write_submission_csv, write_summary_json, write_trades_json};
use crate::manifest::{write_manifest, RunManifest};
use crate::runner::EngineRun;

/// Artifact paths returned after export.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub submission_csv: PathBuf,
    pub trades_json: PathBuf,
    pub summary_json: PathBuf,
    pub manifest_json: PathBuf,
}

/// Writes every artifact of a run into one directory.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    output_dir: PathBuf,
}

impl ArtifactManager {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("failed to create output directory {}", output_dir.display())
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save the submission table, full trades, summary and manifest.
    pub fn save_run(
        &self,
        run: &EngineRun,
        manifest: &RunManifest,
        submission_file: &str,
    ) -> Result<ArtifactPaths> {
        let paths = ArtifactPaths {
            submission_csv: self.output_dir.join(submission_file),
            trades_json: self.output_dir.join("trades.json"),
            summary_json: self.output_dir.join("summary.json"),
            manifest_json: self.output_dir.join("manifest.json"),
        };

        write_submission_csv(&paths.submission_csv, &run.trades)?;
        write_trades_json(&paths.trades_json, &run.trades)?;
        write_summary_json(&paths.summary_json, run.summary.as_ref())?;
        write_manifest(&paths.manifest_json, manifest)?;

        info!(
            dir = %self.output_dir.display(),
            trades = run.trades.len(),
            "artifacts saved"
        );
        Ok(paths)
    }
}
