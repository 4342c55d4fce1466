//! Domain types for PredLab

pub mod row;
pub mod series;
pub mod trade;

pub use row::{PredictionRow, Row, PREDICTION_COUNT};
pub use series::PairSeries;
pub use trade::{PolicyName, TradeRecord, LONG};

/// Pair identifier alias
pub type PairId = String;
