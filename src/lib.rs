//! sigtrader: SMA/RSI/MACD signal backtester for a single price series.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command-line controller in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
