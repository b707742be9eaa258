//! Configuration validation.
//!
//! Validates the `[strategy]` section before a backtest runs. Absent keys are
//! fine (defaults apply); present keys must parse and be in range.

use tracing::warn;

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::TraderError;
use crate::ports::config_port::ConfigPort;

pub const PERIOD_KEYS: [&str; 5] = [
    "ma_period",
    "rsi_period",
    "macd_fast",
    "macd_slow",
    "macd_signal",
];

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    for key in PERIOD_KEYS {
        validate_period(config, key)?;
    }
    validate_rsi_overbought(config)?;
    Ok(())
}

fn invalid(key: &str, reason: &str) -> TraderError {
    TraderError::ConfigInvalid {
        section: "strategy".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_period(config: &dyn ConfigPort, key: &str) -> Result<(), TraderError> {
    let Some(raw) = config.get_string("strategy", key) else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v >= 1 => Ok(()),
        Ok(_) => Err(invalid(key, "must be at least 1")),
        Err(_) => Err(invalid(key, "must be a positive integer")),
    }
}

fn validate_rsi_overbought(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let Some(raw) = config.get_string("strategy", "rsi_overbought") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if (0.0..=100.0).contains(&v) => Ok(()),
        Ok(_) => Err(invalid("rsi_overbought", "must be between 0 and 100")),
        Err(_) => Err(invalid("rsi_overbought", "must be a number")),
    }
}

/// A fast period at or above the slow one is accepted but rarely intended.
/// Runs on the resolved config so command-line overrides are covered.
pub fn warn_on_inverted_macd(config: &BacktestConfig) -> bool {
    let inverted = config.macd_fast >= config.macd_slow;
    if inverted {
        warn!(
            fast = config.macd_fast,
            slow = config.macd_slow,
            "macd_fast is not below macd_slow; signals will be inverted or flat"
        );
    }
    inverted
}
