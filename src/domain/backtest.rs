//! Backtest pipeline: price series -> indicators -> simulator -> metrics.
//!
//! [`BacktestConfig`] carries the indicator periods and the RSI threshold.
//! Values are taken as given; range checks belong to the caller (see
//! [`crate::domain::config_validation`]).

use tracing::{debug, info};

use super::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use super::indicator::{calculate_macd, calculate_rsi, calculate_sma, IndicatorSeries, MacdSeries};
use super::metrics::Metrics;
use super::position::Trade;
use super::price::{closes, PricePoint};
use super::simulator::{simulate, Signals};

pub const DEFAULT_MA_PERIOD: usize = 20;
pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_RSI_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub ma_period: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            ma_period: DEFAULT_MA_PERIOD,
            rsi_period: DEFAULT_RSI_PERIOD,
            rsi_overbought: DEFAULT_RSI_OVERBOUGHT,
            macd_fast: DEFAULT_FAST,
            macd_slow: DEFAULT_SLOW,
            macd_signal: DEFAULT_SIGNAL,
        }
    }
}

/// Every indicator the simulator reads, computed once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub sma: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub macd: MacdSeries,
}

impl IndicatorSet {
    pub fn compute(series: &[PricePoint], config: &BacktestConfig) -> Self {
        let values = closes(series);
        IndicatorSet {
            sma: calculate_sma(&values, config.ma_period),
            rsi: calculate_rsi(&values, config.rsi_period),
            macd: calculate_macd(
                &values,
                config.macd_fast,
                config.macd_slow,
                config.macd_signal,
            ),
        }
    }

    pub fn signals(&self) -> Signals<'_> {
        Signals {
            sma: &self.sma,
            rsi: &self.rsi,
            macd: &self.macd,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub metrics: Metrics,
}

impl BacktestResult {
    pub fn from_trades(trades: Vec<Trade>) -> Self {
        let metrics = Metrics::compute(&trades);
        Self { trades, metrics }
    }
}

/// Run one backtest over an already ordered series.
pub fn run_backtest(series: &[PricePoint], config: &BacktestConfig) -> BacktestResult {
    let indicators = IndicatorSet::compute(series, config);
    debug!(
        bars = series.len(),
        sma_from = ?indicators.sma.first_defined(),
        rsi_from = ?indicators.rsi.first_defined(),
        macd_from = ?indicators.macd.line.first_defined(),
        "indicators computed"
    );

    let trades = simulate(series, &indicators.signals(), config.rsi_overbought);
    let result = BacktestResult::from_trades(trades);

    info!(
        bars = series.len(),
        trades = result.metrics.total_trades,
        win_rate = result.metrics.win_rate,
        profit_factor = %result.metrics.profit_factor,
        "backtest complete"
    );
    result
}
