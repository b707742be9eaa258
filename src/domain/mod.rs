//! Core domain types and logic.
//!
//! Everything here is pure and synchronous; I/O lives in [`crate::adapters`].

pub mod price;
pub mod position;
pub mod indicator;
pub mod simulator;
pub mod backtest;
pub mod metrics;
pub mod config_validation;
pub mod error;
