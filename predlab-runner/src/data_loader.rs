//! Prediction-table loading.
//!
//! Reads the CSV export with columns `keys_pair`, `minutesSinceStart` and
//! `Lpred1b..Lpred9b`. Extra columns (unnamed index columns, labels) are
//! ignored. Empty prediction cells load as NaN, which never passes an
//! entry condition.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use predlab_core::domain::{PredictionRow, PREDICTION_COUNT};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::InputConfig;

pub const PAIR_COLUMN: &str = "keys_pair";
pub const TIME_COLUMN: &str = "minutesSinceStart";
pub const PREDICTION_COLUMNS: [&str; PREDICTION_COUNT] = [
    "Lpred1b", "Lpred2b", "Lpred3b", "Lpred4b", "Lpred5b", "Lpred6b", "Lpred7b", "Lpred8b",
    "Lpred9b",
];

/// Errors from the input collaborator.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open prediction table {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("failed to read header: {0}")]
    Header(#[source] csv::Error),

    #[error("data row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("data row {row}: minutesSinceStart must be finite, got {value}")]
    InvalidTime { row: usize, value: f64 },
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "keys_pair")]
    pair_id: String,
    #[serde(rename = "minutesSinceStart")]
    minutes_since_start: f64,
    #[serde(rename = "Lpred1b")]
    p1: Option<f64>,
    #[serde(rename = "Lpred2b")]
    p2: Option<f64>,
    #[serde(rename = "Lpred3b")]
    p3: Option<f64>,
    #[serde(rename = "Lpred4b")]
    p4: Option<f64>,
    #[serde(rename = "Lpred5b")]
    p5: Option<f64>,
    #[serde(rename = "Lpred6b")]
    p6: Option<f64>,
    #[serde(rename = "Lpred7b")]
    p7: Option<f64>,
    #[serde(rename = "Lpred8b")]
    p8: Option<f64>,
    #[serde(rename = "Lpred9b")]
    p9: Option<f64>,
}

impl RawRecord {
    fn into_row(self, row: usize) -> Result<PredictionRow, LoadError> {
        if !self.minutes_since_start.is_finite() {
            return Err(LoadError::InvalidTime {
                row,
                value: self.minutes_since_start,
            });
        }
        let predictions = [
            self.p1, self.p2, self.p3, self.p4, self.p5, self.p6, self.p7, self.p8, self.p9,
        ]
        .map(|p| p.unwrap_or(f64::NAN));
        Ok(PredictionRow::new(
            self.pair_id,
            self.minutes_since_start.trunc() as i64,
            predictions,
        ))
    }
}

/// Load prediction rows from a CSV file.
pub fn load_prediction_rows(
    path: &Path,
    input: &InputConfig,
) -> Result<Vec<PredictionRow>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_prediction_rows(file, input)?;
    info!(
        path = %path.display(),
        rows = rows.len(),
        skipped = input.skip_rows,
        "loaded prediction table"
    );
    Ok(rows)
}

/// Read prediction rows from any CSV source.
///
/// The first `input.skip_rows` data rows are skipped without being parsed.
/// An empty table yields an empty vector.
pub fn read_prediction_rows<R: Read>(
    reader: R,
    input: &InputConfig,
) -> Result<Vec<PredictionRow>, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().map_err(LoadError::Header)?.clone();

    for required in std::iter::once(PAIR_COLUMN)
        .chain(std::iter::once(TIME_COLUMN))
        .chain(PREDICTION_COLUMNS)
    {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::MissingColumn(required.to_string()));
        }
    }

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate().skip(input.skip_rows) {
        let row = i + 1;
        let record = record.map_err(|source| LoadError::Csv { row, source })?;
        let raw: RawRecord = record
            .deserialize(Some(&headers))
            .map_err(|source| LoadError::Csv { row, source })?;
        rows.push(raw.into_row(row)?);
    }
    debug!(rows = rows.len(), "parsed prediction rows");
    Ok(rows)
}

/// Write prediction rows as a CSV table the loader reads back unchanged.
pub fn write_prediction_rows<W: Write>(writer: W, rows: &[PredictionRow]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec![PAIR_COLUMN, TIME_COLUMN];
    header.extend(PREDICTION_COLUMNS);
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = Vec::with_capacity(2 + PREDICTION_COUNT);
        record.push(row.pair_id.clone());
        record.push(row.minutes_since_start.to_string());
        record.extend(row.predictions.iter().map(|p| p.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
