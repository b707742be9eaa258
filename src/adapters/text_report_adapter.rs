//! Plain-text report adapter implementing ReportPort.
//!
//! Summary block followed by a fixed-width trade table. An infinite profit
//! factor is printed as `inf`.

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::TraderError;
use crate::domain::metrics::Metrics;
use crate::domain::position::Trade;
use crate::ports::report_port::ReportPort;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct TextReportAdapter {
    title: String,
}

impl TextReportAdapter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new("Backtest")
    }
}

pub fn format_parameters(config: &BacktestConfig) -> String {
    format!(
        "SMA({}) | RSI({}) < {} | MACD({},{},{})",
        config.ma_period,
        config.rsi_period,
        config.rsi_overbought,
        config.macd_fast,
        config.macd_slow,
        config.macd_signal
    )
}

pub fn format_summary(metrics: &Metrics) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total Trades:     {}\n", metrics.total_trades));
    out.push_str(&format!(
        "Won / Lost / BE:  {} / {} / {}\n",
        metrics.trades_won, metrics.trades_lost, metrics.trades_breakeven
    ));
    out.push_str(&format!("Win Rate:         {:.2}%\n", metrics.win_rate));
    out.push_str(&format!("Profit Factor:    {:.2}\n", metrics.profit_factor));
    out.push_str(&format!("Gross Profit:     {:.2}\n", metrics.gross_profit));
    out.push_str(&format!("Gross Loss:       {:.2}\n", metrics.gross_loss));
    out.push_str(&format!("Net P&L:          {:.2}\n", metrics.net_pnl));
    out.push_str(&format!("Largest Win:      {:.2}\n", metrics.largest_win));
    out.push_str(&format!("Largest Loss:     {:.2}\n", metrics.largest_loss));
    out.push_str(&format!("Avg Bars Held:    {:.1}\n", metrics.avg_bars_held));
    out
}

pub fn format_trades_table(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return "No trades executed.\n".to_string();
    }

    let mut out = format!(
        "{:>3}  {:<16}  {:<16}  {:>10}  {:>10}  {:>10}  {:>8}\n",
        "#", "Entry", "Exit", "Entry Px", "Exit Px", "P&L", "Return"
    );
    for (i, trade) in trades.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<16}  {:<16}  {:>10.2}  {:>10.2}  {:>10.2}  {:>7.2}%\n",
            i + 1,
            trade.entry_timestamp.format(TIMESTAMP_FORMAT).to_string(),
            trade.exit_timestamp.format(TIMESTAMP_FORMAT).to_string(),
            trade.entry_price,
            trade.exit_price,
            trade.pnl,
            trade.return_pct()
        ));
    }
    out
}

impl ReportPort for TextReportAdapter {
    fn render(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
    ) -> Result<String, TraderError> {
        let mut out = String::new();
        out.push_str(&format!("=== {} ===\n", self.title));
        out.push_str(&format_parameters(config));
        out.push_str("\n\n");
        out.push_str(&format_summary(&result.metrics));
        out.push_str("\n=== Trades ===\n");
        out.push_str(&format_trades_table(&result.trades));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample_trade(entry: f64, exit: f64) -> Trade {
        Trade {
            entry_index: 1,
            exit_index: 4,
            entry_timestamp: ts(2),
            exit_timestamp: ts(5),
            entry_price: entry,
            exit_price: exit,
            pnl: exit - entry,
        }
    }

    #[test]
    fn parameters_line() {
        let line = format_parameters(&BacktestConfig::default());
        assert_eq!(line, "SMA(20) | RSI(14) < 70 | MACD(12,26,9)");
    }

    #[test]
    fn empty_trades_table() {
        assert_eq!(format_trades_table(&[]), "No trades executed.\n");
    }

    #[test]
    fn trades_table_rows() {
        let table = format_trades_table(&[sample_trade(10.0, 12.0), sample_trade(12.0, 11.0)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("2024-01-02 00:00"));
        assert!(lines[1].contains("20.00%"));
        assert!(lines[2].contains("-1.00"));
    }

    #[test]
    fn render_shows_infinite_profit_factor() {
        let result = BacktestResult::from_trades(vec![sample_trade(10.0, 14.0)]);
        let report = TextReportAdapter::new("AAPL")
            .render(&result, &BacktestConfig::default())
            .unwrap();

        assert!(report.starts_with("=== AAPL ===\n"));
        assert!(report.contains("Total Trades:     1\n"));
        assert!(report.contains("Win Rate:         100.00%\n"));
        assert!(report.contains("Profit Factor:    inf\n"));
    }

    #[test]
    fn render_finite_profit_factor() {
        let result =
            BacktestResult::from_trades(vec![sample_trade(10.0, 13.0), sample_trade(10.0, 9.0)]);
        let report = TextReportAdapter::default()
            .render(&result, &BacktestConfig::default())
            .unwrap();
        assert!(report.contains("Profit Factor:    3.00\n"));
        assert!(report.contains("Win Rate:         50.00%\n"));
    }

    #[test]
    fn write_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        let result = BacktestResult::from_trades(vec![]);

        TextReportAdapter::default()
            .write(&result, &BacktestConfig::default(), &path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("No trades executed."));
        assert!(content.contains("Profit Factor:    inf"));
    }
}
