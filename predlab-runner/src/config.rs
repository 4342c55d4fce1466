//! Serializable engine configuration.
//!
//! Every field has a default, and the defaults reproduce the reference
//! policy constants exactly, so an empty TOML file is a valid config.

use std::path::{Path, PathBuf};

use predlab_core::domain::PolicyName;
use predlab_core::policy::{
    MomentumScalping, MomentumScalpingParams, SafeArbitrage, SafeArbitrageParams, TradePolicy,
    UltraSelective, UltraSelectiveParams, DEFAULT_FEE_RATE,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating an `EngineConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("fee_rate must be finite and >= 0, got {0}")]
    InvalidFeeRate(f64),

    #[error("{policy}: hold_steps must be >= 1")]
    ZeroHoldSteps { policy: PolicyName },

    #[error("{policy}: hold_steps ({hold_steps}) exceeds tail ({tail}), exits would run past the series end")]
    HoldPastTail {
        policy: PolicyName,
        hold_steps: usize,
        tail: usize,
    },

    #[error("{policy}: stability_window ({window}) must be in 2..=warmup ({warmup})")]
    InvalidStabilityWindow {
        policy: PolicyName,
        window: usize,
        warmup: usize,
    },

    #[error("{policy}: return_floor ({floor}) exceeds return_cap ({cap})")]
    InvertedReturnBounds {
        policy: PolicyName,
        floor: f64,
        cap: f64,
    },

    #[error("no policies enabled")]
    NoPolicies,

    #[error("policy {0} enabled more than once")]
    DuplicatePolicy(PolicyName),
}

/// How pairs are scanned.
///
/// Both modes produce identical trade lists; `Parallel` scans pairs on the
/// rayon pool and applies each cap as a final truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    #[default]
    Sequential,
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Data rows dropped from the head of the table (the validation-window
    /// slice).
    pub skip_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub submission_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
            submission_file: "crypto_trading_results.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete configuration for one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-side transaction cost, charged twice per trade.
    pub fee_rate: f64,
    pub scan_mode: ScanMode,
    pub enabled_policies: Vec<PolicyName>,
    pub ultra_selective: UltraSelectiveParams,
    pub momentum_scalping: MomentumScalpingParams,
    pub safe_arbitrage: SafeArbitrageParams,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fee_rate: DEFAULT_FEE_RATE,
            scan_mode: ScanMode::default(),
            enabled_policies: PolicyName::ALL.to_vec(),
            ultra_selective: UltraSelectiveParams::default(),
            momentum_scalping: MomentumScalpingParams::default(),
            safe_arbitrage: SafeArbitrageParams::default(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fee_rate.is_finite() || self.fee_rate < 0.0 {
            return Err(ConfigError::InvalidFeeRate(self.fee_rate));
        }

        if self.enabled_policies.is_empty() {
            return Err(ConfigError::NoPolicies);
        }
        for (i, policy) in self.enabled_policies.iter().enumerate() {
            if self.enabled_policies[..i].contains(policy) {
                return Err(ConfigError::DuplicatePolicy(*policy));
            }
        }

        let us = &self.ultra_selective;
        check_bounds(PolicyName::UltraSelective, us.return_floor, us.return_cap)?;

        let ms = &self.momentum_scalping;
        check_horizon(PolicyName::MomentumScalping, ms.hold_steps, ms.tail)?;
        check_bounds(PolicyName::MomentumScalping, ms.return_floor, ms.return_cap)?;

        let sa = &self.safe_arbitrage;
        check_horizon(PolicyName::SafeArbitrage, sa.hold_steps, sa.tail)?;
        check_bounds(PolicyName::SafeArbitrage, sa.return_floor, sa.return_cap)?;
        if sa.stability_window < 2 || sa.stability_window > sa.warmup {
            return Err(ConfigError::InvalidStabilityWindow {
                policy: PolicyName::SafeArbitrage,
                window: sa.stability_window,
                warmup: sa.warmup,
            });
        }

        Ok(())
    }

    /// Enabled policies, built from their params, in canonical order.
    pub fn policies(&self) -> Vec<Box<dyn TradePolicy>> {
        let mut enabled = self.enabled_policies.clone();
        enabled.sort();
        enabled.dedup();
        enabled
            .into_iter()
            .map(|name| -> Box<dyn TradePolicy> {
                match name {
                    PolicyName::UltraSelective => {
                        Box::new(UltraSelective::new(self.ultra_selective.clone()))
                    }
                    PolicyName::MomentumScalping => {
                        Box::new(MomentumScalping::new(self.momentum_scalping.clone()))
                    }
                    PolicyName::SafeArbitrage => {
                        Box::new(SafeArbitrage::new(self.safe_arbitrage.clone()))
                    }
                }
            })
            .collect()
    }

    /// Deterministic BLAKE3 hash of the config, for run manifests.
    pub fn config_hash(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

fn check_horizon(policy: PolicyName, hold_steps: usize, tail: usize) -> Result<(), ConfigError> {
    if hold_steps == 0 {
        return Err(ConfigError::ZeroHoldSteps { policy });
    }
    if hold_steps > tail {
        return Err(ConfigError::HoldPastTail {
            policy,
            hold_steps,
            tail,
        });
    }
    Ok(())
}

fn check_bounds(policy: PolicyName, floor: f64, cap: f64) -> Result<(), ConfigError> {
    if floor > cap {
        return Err(ConfigError::InvertedReturnBounds { policy, floor, cap });
    }
    Ok(())
}
