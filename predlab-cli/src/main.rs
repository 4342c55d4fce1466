//! PredLab CLI — run the decision engine over a prediction table.
//!
//! Commands:
//! - `run` — derive signals, scan with every enabled policy, write artifacts
//! - `synth` — write a deterministic synthetic prediction table

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use predlab_core::synthetic::generate_rows;
use predlab_runner::manifest::hash_file;
use predlab_runner::{
    render_report, run_from_path, write_prediction_rows, ArtifactManager, EngineConfig,
    RunManifest, ScanMode,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "predlab",
    about = "PredLab CLI — turn multi-horizon predictions into trade decisions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all enabled policies over a prediction table.
    Run {
        /// Prediction table (CSV with keys_pair, minutesSinceStart, Lpred1b..Lpred9b).
        #[arg(long)]
        input: PathBuf,

        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory, overriding the config.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Skip this many leading data rows, overriding the config.
        #[arg(long)]
        skip_rows: Option<usize>,

        /// Scan pairs in parallel.
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Write a synthetic prediction table.
    Synth {
        /// Output CSV path.
        #[arg(long)]
        output: PathBuf,

        /// Number of pairs.
        #[arg(long, default_value_t = 8)]
        pairs: usize,

        /// Rows per pair.
        #[arg(long, default_value_t = 2000)]
        rows: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            config,
            output_dir,
            skip_rows,
            parallel,
        } => run_cmd(&input, config.as_deref(), output_dir, skip_rows, parallel),
        Commands::Synth {
            output,
            pairs,
            rows,
            seed,
        } => {
            init_tracing("info");
            synth_cmd(&output, pairs, rows, seed)
        }
    }
}

/// RUST_LOG wins over the configured level. Logs go to stderr so the
/// report on stdout stays clean.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_cmd(
    input: &Path,
    config_path: Option<&Path>,
    output_dir: Option<PathBuf>,
    skip_rows: Option<usize>,
    parallel: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = output_dir {
        config.output.dir = dir;
    }
    if let Some(n) = skip_rows {
        config.input.skip_rows = n;
    }
    if parallel {
        config.scan_mode = ScanMode::Parallel;
    }

    init_tracing(&config.logging.level);

    let run = run_from_path(input, &config)?;
    print!("{}", render_report(&run));

    let dataset_hash = hash_file(input)?;
    let manifest = RunManifest::new(&run, &config, Some(dataset_hash))?;
    let manager = ArtifactManager::new(&config.output.dir)?;
    let paths = manager.save_run(&run, &manifest, &config.output.submission_file)?;

    println!("\nResults saved to: {}", paths.submission_csv.display());
    println!("Artifacts saved to: {}", manager.output_dir().display());
    Ok(())
}

fn synth_cmd(output: &Path, pairs: usize, rows_per_pair: usize, seed: u64) -> Result<()> {
    let rows = generate_rows(pairs, rows_per_pair, seed);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    write_prediction_rows(file, &rows)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(pairs, rows = rows.len(), seed, "synthetic table written");
    println!("Wrote {} rows to {}", rows.len(), output.display());
    Ok(())
}
