//! Simulation configuration
//!
//! Loaded from JSON. Every field has a default so a config file only
//! needs to name what it changes.

use helios_core::{Cents, Path, Price, Symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

const DAY_MS: i64 = 86_400_000;

/// Root configuration for a pulse-driven simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Starting cash in minor units
    pub cash: Cents,

    /// Candidates older than this are evicted on decay
    pub max_age_ms: i64,

    /// Directory whose file names are the pulses; without it pulses are
    /// generated every `pulse_step_ms` from `start` to `stop`
    pub pulse_dir: Option<PathBuf>,

    /// Spacing of generated pulses
    pub pulse_step_ms: i64,

    /// First pulse (inclusive, ms since the epoch)
    pub start: i64,

    /// Last pulse (inclusive, ms since the epoch)
    pub stop: i64,

    /// Capacity of every actor mailbox
    pub mailbox_capacity: usize,

    /// Percent return above which a path is put back into the candidates
    pub reinsert_threshold: Decimal,

    /// Close a position once its return reaches this percent
    pub take_profit: Decimal,

    /// Close a position once it has lost this percent
    pub stop_loss: Decimal,

    /// Decay candidates every N pulses (0 disables)
    pub decay_every: u64,

    /// Re-allot capital every N pulses (0 disables)
    pub reallot_every: u64,

    /// Seed for candidate selection
    pub seed: Option<u64>,

    /// Paths loaded into the candidate store before the first pulse
    pub candidates: Vec<Path>,

    /// Scheduled marks for the paper brokerage
    pub marks: Vec<MarkConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cash: 10_000_000,
            max_age_ms: DAY_MS,
            pulse_dir: None,
            pulse_step_ms: DAY_MS,
            start: 0,
            stop: 0,
            mailbox_capacity: helios_ports::DEFAULT_MAILBOX_CAPACITY,
            reinsert_threshold: dec!(100),
            take_profit: dec!(100),
            stop_loss: dec!(50),
            decay_every: 1,
            reallot_every: 0,
            seed: None,
            candidates: Vec::new(),
            marks: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cash < 0 {
            return Err(ConfigError::Invalid("cash must not be negative".to_string()));
        }
        if self.stop < self.start {
            return Err(ConfigError::Invalid(format!(
                "stop {} is before start {}",
                self.stop, self.start
            )));
        }
        if self.max_age_ms <= 0 {
            return Err(ConfigError::Invalid("max_age_ms must be positive".to_string()));
        }
        if self.pulse_step_ms <= 0 {
            return Err(ConfigError::Invalid(format!(
                "pulse_step_ms must be positive, got {}",
                self.pulse_step_ms
            )));
        }
        Ok(())
    }
}

/// A price the paper brokerage marks a symbol at from `at` onwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkConfig {
    pub symbol: Symbol,
    /// ms since the epoch
    pub at: i64,
    pub price: Price,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = SimulationConfig::from_json(r#"{"cash": 500000, "stop": 172800000}"#).unwrap();
        assert_eq!(config.cash, 500_000);
        assert_eq!(config.max_age_ms, DAY_MS);
        assert_eq!(config.take_profit, dec!(100));
        assert!(config.candidates.is_empty());
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "cash": 1000000,
            "max_age_ms": 3600000,
            "pulse_dir": "/data/pulses",
            "start": 0,
            "stop": 86400000,
            "mailbox_capacity": 8,
            "reinsert_threshold": "50",
            "take_profit": "25",
            "stop_loss": "10",
            "decay_every": 2,
            "reallot_every": 5,
            "seed": 7,
            "candidates": [
                {"destination": {"symbol": "GOOG", "kind": "stock"}, "price": "150"}
            ],
            "marks": [{"symbol": "GOOG", "at": 86400000, "price": "180"}]
        }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        assert_eq!(config.pulse_dir, Some(PathBuf::from("/data/pulses")));
        assert_eq!(config.reinsert_threshold, dec!(50));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.candidates[0].destination.symbol, "GOOG");
        assert_eq!(config.marks[0].price, dec!(180));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let err = SimulationConfig::from_json(r#"{"start": 10, "stop": 5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_non_positive_pulse_step_rejected() {
        for step in [0, -1000] {
            let json = format!(r#"{{"stop": 5000, "pulse_step_ms": {}}}"#, step);
            let err = SimulationConfig::from_json(&json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)));
        }
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            SimulationConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SimulationConfig::from_file("/no/such/helios.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
