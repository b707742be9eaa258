//! Report generation port.

use std::fs;
use std::path::Path;

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::TraderError;

/// Port for presenting backtest results.
pub trait ReportPort {
    fn render(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
    ) -> Result<String, TraderError>;

    /// Default implementation: renders and writes the whole report to `output_path`.
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        output_path: &Path,
    ) -> Result<(), TraderError> {
        let content = self.render(result, config)?;
        fs::write(output_path, content).map_err(|e| TraderError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })
    }
}
