//! Single-position long-only trade simulator.
//!
//! Walks bars 1..len in lockstep with the indicator series. Bar 0 is never
//! evaluated because both crossover checks need the previous bar.
//!
//! # Transitions
//!
//! - `Flat -> Long`: close above SMA, bullish MACD crossover, RSI below the
//!   overbought threshold. Every input must be defined on the bar.
//! - `Long -> Flat`: bearish MACD crossover, or the final bar (forced exit).

use tracing::debug;

use crate::domain::indicator::{IndicatorSeries, MacdSeries};
use crate::domain::position::{OpenPosition, Trade};
use crate::domain::price::PricePoint;

/// Indicator inputs consumed by the simulator, aligned to the price series.
#[derive(Debug, Clone)]
pub struct Signals<'a> {
    pub sma: &'a IndicatorSeries,
    pub rsi: &'a IndicatorSeries,
    pub macd: &'a MacdSeries,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimState {
    Flat,
    Long(OpenPosition),
}

/// MACD line and signal at `index - 1` and `index`, when all four are defined.
fn macd_pair(macd: &MacdSeries, index: usize) -> Option<((f64, f64), (f64, f64))> {
    let prev = index.checked_sub(1)?;
    Some((
        (macd.line.get(prev)?, macd.signal.get(prev)?),
        (macd.line.get(index)?, macd.signal.get(index)?),
    ))
}

/// Line moved from at-or-below the signal to above it.
pub fn bullish_crossover(macd: &MacdSeries, index: usize) -> bool {
    macd_pair(macd, index)
        .is_some_and(|((line_prev, sig_prev), (line, sig))| line_prev <= sig_prev && line > sig)
}

/// Line moved from at-or-above the signal to below it.
pub fn bearish_crossover(macd: &MacdSeries, index: usize) -> bool {
    macd_pair(macd, index)
        .is_some_and(|((line_prev, sig_prev), (line, sig))| line_prev >= sig_prev && line < sig)
}

pub fn should_enter(
    series: &[PricePoint],
    signals: &Signals<'_>,
    rsi_overbought: f64,
    index: usize,
) -> bool {
    let Some(sma) = signals.sma.get(index) else {
        return false;
    };
    let Some(rsi) = signals.rsi.get(index) else {
        return false;
    };
    series[index].close > sma && bullish_crossover(signals.macd, index) && rsi < rsi_overbought
}

/// Run the state machine over the whole series and return closed trades in
/// order. A position still open on the last bar is closed there.
pub fn simulate(series: &[PricePoint], signals: &Signals<'_>, rsi_overbought: f64) -> Vec<Trade> {
    let mut trades = Vec::new();
    let mut state = SimState::Flat;
    let last = series.len().saturating_sub(1);

    for index in 1..series.len() {
        let bar = &series[index];
        state = match state {
            SimState::Flat => {
                if should_enter(series, signals, rsi_overbought, index) {
                    debug!(index, price = bar.close, timestamp = %bar.timestamp, "open long");
                    SimState::Long(OpenPosition {
                        entry_index: index,
                        entry_timestamp: bar.timestamp,
                        entry_price: bar.close,
                    })
                } else {
                    SimState::Flat
                }
            }
            SimState::Long(position) => {
                let crossed = bearish_crossover(signals.macd, index);
                if crossed || index == last {
                    let trade = position.close(index, bar.timestamp, bar.close);
                    debug!(
                        index,
                        price = bar.close,
                        pnl = trade.pnl,
                        forced = !crossed,
                        "close long"
                    );
                    trades.push(trade);
                    SimState::Flat
                } else {
                    SimState::Long(position)
                }
            }
        };
    }

    trades
}
