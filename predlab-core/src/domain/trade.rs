//! TradeRecord — a discrete long trade emitted by a policy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction code for a long trade; every policy trades long only.
pub const LONG: i32 = 1;

/// The three trade-generation policies, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PolicyName {
    UltraSelective,
    MomentumScalping,
    SafeArbitrage,
}

impl PolicyName {
    pub const ALL: [PolicyName; 3] = [
        PolicyName::UltraSelective,
        PolicyName::MomentumScalping,
        PolicyName::SafeArbitrage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyName::UltraSelective => "UltraSelective",
            PolicyName::MomentumScalping => "MomentumScalping",
            PolicyName::SafeArbitrage => "SafeArbitrage",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for PolicyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trade record: entry → exit on one pair.
///
/// `estimated_return` is a modeled scalar clipped to the emitting policy's
/// range, not a fill-based return. NaN marks an undefined return and is
/// excluded from every statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub pair_id: String,
    pub enter_time: i64,
    pub exit_time: i64,
    pub direction: i32,
    pub size_fraction: f64,
    pub policy: PolicyName,
    pub estimated_return: f64,
}

impl TradeRecord {
    /// Full-size long trade.
    pub fn long(
        pair_id: impl Into<String>,
        enter_time: i64,
        exit_time: i64,
        policy: PolicyName,
        estimated_return: f64,
    ) -> Self {
        Self {
            pair_id: pair_id.into(),
            enter_time,
            exit_time,
            direction: LONG,
            size_fraction: 1.0,
            policy,
            estimated_return,
        }
    }

    pub fn holding_minutes(&self) -> i64 {
        self.exit_time - self.enter_time
    }

    pub fn has_return(&self) -> bool {
        !self.estimated_return.is_nan()
    }

    pub fn is_winner(&self) -> bool {
        self.estimated_return > 0.0
    }
}
