//! RSI (Relative Strength Index) using Wilder's smoothing.
//!
//! - Seed: simple mean of gains/losses over the first n price changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)), or 100 when avg_loss == 0.
//!
//! Warmup: first n values are undefined (n price changes are needed for the seed).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

/// Wilder-smoothed average gain and loss.
#[derive(Debug, Clone, PartialEq)]
pub struct WilderState {
    period: usize,
    avg_gain: f64,
    avg_loss: f64,
}

impl WilderState {
    /// Seed from the first `period` deltas.
    pub fn seed(period: usize, deltas: &[f64]) -> Self {
        let (gains, losses) = deltas.iter().fold((0.0, 0.0), |(g, l), &d| {
            let (gain, loss) = split_delta(d);
            (g + gain, l + loss)
        });
        Self {
            period,
            avg_gain: gains / period as f64,
            avg_loss: losses / period as f64,
        }
    }

    pub fn step(&mut self, delta: f64) {
        let (gain, loss) = split_delta(delta);
        let n = self.period as f64;
        self.avg_gain = (self.avg_gain * (n - 1.0) + gain) / n;
        self.avg_loss = (self.avg_loss * (n - 1.0) + loss) / n;
    }

    pub fn rsi(&self) -> f64 {
        if self.avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + self.avg_gain / self.avg_loss)
        }
    }
}

/// Positive part and magnitude of the negative part of a price change.
fn split_delta(delta: f64) -> (f64, f64) {
    if delta > 0.0 {
        (delta, 0.0)
    } else if delta < 0.0 {
        (0.0, -delta)
    } else {
        (0.0, 0.0)
    }
}

pub fn calculate_rsi(values: &[f64], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Rsi(period);
    let mut series = IndicatorSeries::undefined(indicator_type, values.len());
    if period == 0 || values.len() <= period {
        return series;
    }

    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let mut state = WilderState::seed(period, &deltas[..period]);
    series.values[period] = Some(state.rsi());

    for i in (period + 1)..values.len() {
        state.step(deltas[i - 1]);
        series.values[i] = Some(state.rsi());
    }

    series
}
