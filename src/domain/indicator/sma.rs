//! Simple Moving Average.
//!
//! SMA[i] = mean(values[i-n+1..=i]), maintained as a running window sum.
//! Warmup: first (n-1) values are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

/// Rolling sum over the last `period` values.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningSum {
    period: usize,
    sum: f64,
    seen: usize,
}

impl RunningSum {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            sum: 0.0,
            seen: 0,
        }
    }

    /// Add `incoming`, drop `leaving` (the value falling out of the window, if
    /// any) and return the window mean once the window is full.
    pub fn step(&mut self, incoming: f64, leaving: Option<f64>) -> Option<f64> {
        self.sum += incoming;
        if let Some(old) = leaving {
            self.sum -= old;
        }
        self.seen += 1;
        (self.seen >= self.period).then(|| self.sum / self.period as f64)
    }
}

pub fn calculate_sma(values: &[f64], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Sma(period);
    if period == 0 {
        return IndicatorSeries::undefined(indicator_type, values.len());
    }

    let mut window = RunningSum::new(period);
    let values = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let leaving = i.checked_sub(period).map(|j| values[j]);
            window.step(v, leaving)
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sma_warmup() {
        let series = calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(series.values.len(), 5);
        assert!(series.values[0].is_none());
        assert!(series.values[1].is_none());
        assert!(series.values[2].is_some());
    }

    #[test]
    fn sma_window_mean() {
        let series = calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_relative_eq!(series.get(2).unwrap(), 2.0);
        assert_relative_eq!(series.get(3).unwrap(), 3.0);
        assert_relative_eq!(series.get(4).unwrap(), 4.0);
    }

    #[test]
    fn sma_period_1_is_identity() {
        let input = [7.0, 3.5, 9.25];
        let series = calculate_sma(&input, 1);
        for (i, v) in input.iter().enumerate() {
            assert_relative_eq!(series.get(i).unwrap(), *v);
        }
    }

    #[test]
    fn sma_shorter_than_period() {
        let series = calculate_sma(&[1.0, 2.0], 5);
        assert_eq!(series.values, vec![None, None]);
    }

    #[test]
    fn sma_empty() {
        assert!(calculate_sma(&[], 3).is_empty());
    }

    #[test]
    fn sma_period_0() {
        let series = calculate_sma(&[1.0, 2.0], 0);
        assert_eq!(series.values, vec![None, None]);
    }

    #[test]
    fn sma_indicator_type() {
        assert_eq!(calculate_sma(&[1.0], 4).indicator_type, IndicatorType::Sma(4));
    }

    #[test]
    fn running_sum_steps() {
        let mut window = RunningSum::new(2);
        assert_eq!(window.step(4.0, None), None);
        assert_eq!(window.step(6.0, None), Some(5.0));
        assert_eq!(window.step(10.0, Some(4.0)), Some(8.0));
    }
}
