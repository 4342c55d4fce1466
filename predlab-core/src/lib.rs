//! PredLab Core — signal-to-trade decision engine.
//!
//! This crate contains the pure decision logic:
//! - Domain types (prediction rows, derived rows, pair series, trades)
//! - Rolling and cross-sectional statistics
//! - Signal derivation (blended signal, volatility, momentum)
//! - Three trade policies behind one `TradePolicy` trait
//! - Seeded synthetic prediction tables for tests and benches
//!
//! No I/O happens here; loading and exporting live in `predlab-runner`.

pub mod domain;
pub mod indicators;
pub mod policy;
pub mod signal;
pub mod synthetic;
