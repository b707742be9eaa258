//! CSV exports: closed trades, and the aligned indicator table.

use crate::domain::backtest::{BacktestConfig, BacktestResult, IndicatorSet};
use crate::domain::error::TraderError;
use crate::domain::price::PricePoint;
use crate::ports::report_port::ReportPort;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row per closed trade.
#[derive(Debug, Default)]
pub struct CsvTradeReportAdapter;

impl CsvTradeReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn report_error(e: impl std::fmt::Display) -> TraderError {
    TraderError::Report {
        reason: format!("CSV write error: {}", e),
    }
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, TraderError> {
    let bytes = wtr.into_inner().map_err(report_error)?;
    String::from_utf8(bytes).map_err(report_error)
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ReportPort for CsvTradeReportAdapter {
    fn render(
        &self,
        result: &BacktestResult,
        _config: &BacktestConfig,
    ) -> Result<String, TraderError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record([
            "entry_timestamp",
            "exit_timestamp",
            "entry_index",
            "exit_index",
            "entry_price",
            "exit_price",
            "pnl",
        ])
        .map_err(report_error)?;

        for trade in &result.trades {
            wtr.write_record([
                trade.entry_timestamp.format(TIMESTAMP_FORMAT).to_string(),
                trade.exit_timestamp.format(TIMESTAMP_FORMAT).to_string(),
                trade.entry_index.to_string(),
                trade.exit_index.to_string(),
                trade.entry_price.to_string(),
                trade.exit_price.to_string(),
                trade.pnl.to_string(),
            ])
            .map_err(report_error)?;
        }

        finish(wtr)
    }
}

/// Timestamp, close and every indicator column, one row per bar. Undefined
/// values are written as empty cells.
pub fn render_indicator_table(
    series: &[PricePoint],
    indicators: &IndicatorSet,
) -> Result<String, TraderError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "timestamp".to_string(),
        "close".to_string(),
        indicators.sma.indicator_type.to_string(),
        indicators.rsi.indicator_type.to_string(),
        indicators.macd.line.indicator_type.to_string(),
        indicators.macd.signal.indicator_type.to_string(),
        "MACD_HIST".to_string(),
    ])
    .map_err(report_error)?;

    let histogram = indicators.macd.histogram();
    for (i, point) in series.iter().enumerate() {
        wtr.write_record([
            point.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            point.close.to_string(),
            cell(indicators.sma.get(i)),
            cell(indicators.rsi.get(i)),
            cell(indicators.macd.line.get(i)),
            cell(indicators.macd.signal.get(i)),
            cell(histogram.get(i).copied().flatten()),
        ])
        .map_err(report_error)?;
    }

    finish(wtr)
}
