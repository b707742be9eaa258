//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first raw value (not an SMA of the first n
//! values), then EMA[i] = v[i]*k + EMA[i-1]*(1-k) for every i >= 1.
//! The recurrence runs from index 0; only the reported values are masked for
//! the first (n-1) positions.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

/// Running exponential value.
#[derive(Debug, Clone, PartialEq)]
pub struct EmaState {
    k: f64,
    value: Option<f64>,
}

impl EmaState {
    pub fn new(period: usize) -> Self {
        Self {
            k: smoothing_factor(period),
            value: None,
        }
    }

    /// Fold `v` into the running value. The first call seeds it with `v`.
    pub fn step(&mut self, v: f64) -> f64 {
        let next = match self.value {
            None => v,
            Some(prev) => v * self.k + prev * (1.0 - self.k),
        };
        self.value = Some(next);
        next
    }
}

pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

pub fn calculate_ema(values: &[f64], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Ema(period);
    if period == 0 {
        return IndicatorSeries::undefined(indicator_type, values.len());
    }

    let mut state = EmaState::new(period);
    let values = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let running = state.step(v);
            (i + 1 >= period).then_some(running)
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
