//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line   = EMA(fast) - EMA(slow), defined where both EMAs are
//! Signal Line = EMA(signal) of the MACD line with undefined entries read as 0
//!
//! The zero fill means the signal EMA is already running through the MACD
//! warm-up, so early signal values lean toward zero.

use crate::domain::indicator::{calculate_ema, IndicatorSeries, IndicatorType};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
}

impl MacdSeries {
    /// line - signal where both are defined.
    pub fn histogram(&self) -> Vec<Option<f64>> {
        self.line
            .values
            .iter()
            .zip(&self.signal.values)
            .map(|(l, s)| Some((*l)? - (*s)?))
            .collect()
    }
}

pub fn calculate_macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    let ema_fast = calculate_ema(values, fast);
    let ema_slow = calculate_ema(values, slow);

    let line: Vec<Option<f64>> = ema_fast
        .values
        .iter()
        .zip(&ema_slow.values)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    let zero_filled: Vec<f64> = line.iter().map(|v| v.unwrap_or(0.0)).collect();
    let signal = calculate_ema(&zero_filled, signal_period);

    MacdSeries {
        line: IndicatorSeries {
            indicator_type: IndicatorType::MacdLine { fast, slow },
            values: line,
        },
        signal: IndicatorSeries {
            indicator_type: IndicatorType::MacdSignal {
                fast,
                slow,
                signal: signal_period,
            },
            values: signal.values,
        },
    }
}
