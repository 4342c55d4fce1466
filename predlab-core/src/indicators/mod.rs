//! Rolling and cross-sectional statistics used by the signal deriver and
//! the policies.
//!
//! All functions are pure: slice in, value(s) out.

pub mod rolling;
pub mod stats;

pub use rolling::trailing_mean;
pub use stats::{clip, mean, sample_std_dev};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for statistic tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-12;
