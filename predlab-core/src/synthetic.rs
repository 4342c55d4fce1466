//! Deterministic synthetic prediction tables.
//!
//! Each pair follows a mean-reverting latent score; the nine predictions
//! are the negated latent plus small independent noise, so the derived
//! entry signal tracks the latent and volatility stays low. Rows come back
//! shuffled across pairs and time, like an unsorted export.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::domain::{PredictionRow, PREDICTION_COUNT};

const PAIR_NAMES: [&str; 8] = [
    "EURUSD", "GBPUSD", "USDJPY", "AUDUSD", "USDCHF", "USDCAD", "NZDUSD", "EURGBP",
];

/// Minutes between consecutive rows of one pair.
pub const ROW_INTERVAL_MINUTES: i64 = 5;

const LATENT_PERSISTENCE: f64 = 0.85;
const LATENT_SHOCK: f64 = 0.0015;
const PREDICTION_NOISE: f64 = 0.0005;

/// Name of the `index`-th synthetic pair.
pub fn pair_name(index: usize) -> String {
    match PAIR_NAMES.get(index) {
        Some(name) => (*name).to_string(),
        None => format!("PAIR{index:03}"),
    }
}

/// Generate `pairs * rows_per_pair` rows. Same seed, same rows.
pub fn generate_rows(pairs: usize, rows_per_pair: usize, seed: u64) -> Vec<PredictionRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(pairs * rows_per_pair);

    for p in 0..pairs {
        let name = pair_name(p);
        let mut latent = 0.0_f64;
        for t in 0..rows_per_pair {
            latent = LATENT_PERSISTENCE * latent + rng.gen_range(-LATENT_SHOCK..LATENT_SHOCK);
            let mut predictions = [0.0; PREDICTION_COUNT];
            for pred in predictions.iter_mut() {
                *pred = -latent + rng.gen_range(-PREDICTION_NOISE..PREDICTION_NOISE);
            }
            rows.push(PredictionRow::new(
                name.clone(),
                t as i64 * ROW_INTERVAL_MINUTES,
                predictions,
            ));
        }
    }

    rows.shuffle(&mut rng);
    rows
}
