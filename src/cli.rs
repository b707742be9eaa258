//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::{render_indicator_table, CsvTradeReportAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{
    self as backtest_engine, BacktestConfig, BacktestResult, IndicatorSet, DEFAULT_MA_PERIOD,
    DEFAULT_RSI_OVERBOUGHT, DEFAULT_RSI_PERIOD,
};
use crate::domain::config_validation::{validate_strategy_config, warn_on_inverted_macd};
use crate::domain::error::TraderError;
use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "SMA/RSI/MACD signal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest for one symbol
    Backtest {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        overrides: StrategyOverrides,
    },
    /// Export the computed indicator table as CSV
    Indicators {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        overrides: StrategyOverrides,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in a data directory
    ListSymbols {
        #[arg(short, long)]
        data_dir: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    #[arg(short, long)]
    pub config: PathBuf,
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
    #[arg(short, long)]
    pub symbol: Option<String>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Command-line values that take precedence over `[strategy]` in the file.
#[derive(Args, Debug, Clone, Default)]
pub struct StrategyOverrides {
    #[arg(long, value_parser = parse_period)]
    pub ma_period: Option<usize>,
    #[arg(long, value_parser = parse_period)]
    pub rsi_period: Option<usize>,
    #[arg(long, value_parser = parse_threshold)]
    pub rsi_overbought: Option<f64>,
    #[arg(long, value_parser = parse_period)]
    pub macd_fast: Option<usize>,
    #[arg(long, value_parser = parse_period)]
    pub macd_slow: Option<usize>,
    #[arg(long, value_parser = parse_period)]
    pub macd_signal: Option<usize>,
}

impl StrategyOverrides {
    pub fn apply(&self, config: &mut BacktestConfig) {
        if let Some(v) = self.ma_period {
            config.ma_period = v;
        }
        if let Some(v) = self.rsi_period {
            config.rsi_period = v;
        }
        if let Some(v) = self.rsi_overbought {
            config.rsi_overbought = v;
        }
        if let Some(v) = self.macd_fast {
            config.macd_fast = v;
        }
        if let Some(v) = self.macd_slow {
            config.macd_slow = v;
        }
        if let Some(v) = self.macd_signal {
            config.macd_signal = v;
        }
    }
}

fn parse_period(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("period must be at least 1".to_string()),
        Ok(v) => Ok(v),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    if (0.0..=100.0).contains(&v) {
        Ok(v)
    } else {
        Err("threshold must be between 0 and 100".to_string())
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest { source, overrides } => run_backtest(&source, &overrides),
        Command::Indicators { source, overrides } => run_indicators(&source, &overrides),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { data_dir } => run_list_symbols(&data_dir),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TraderError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Validated `[strategy]` values with defaults for absent keys.
pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, TraderError> {
    validate_strategy_config(config)?;
    Ok(BacktestConfig {
        ma_period: config.get_usize("strategy", "ma_period", DEFAULT_MA_PERIOD),
        rsi_period: config.get_usize("strategy", "rsi_period", DEFAULT_RSI_PERIOD),
        rsi_overbought: config.get_double("strategy", "rsi_overbought", DEFAULT_RSI_OVERBOUGHT),
        macd_fast: config.get_usize("strategy", "macd_fast", DEFAULT_FAST),
        macd_slow: config.get_usize("strategy", "macd_slow", DEFAULT_SLOW),
        macd_signal: config.get_usize("strategy", "macd_signal", DEFAULT_SIGNAL),
    })
}

pub fn resolve_symbol(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, TraderError> {
    symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("data", "symbol"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TraderError::ConfigMissing {
            section: "data".into(),
            key: "symbol".into(),
        })
}

pub fn resolve_data_dir(dir_override: Option<&Path>, config: &dyn ConfigPort) -> PathBuf {
    dir_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("data", "directory").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn resolve_output(output_override: Option<&Path>, config: &dyn ConfigPort) -> Option<PathBuf> {
    output_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("report", "output").map(PathBuf::from))
}

/// `.csv` paths get the trade CSV; everything else gets the text report.
pub fn report_adapter_for(output: Option<&Path>, symbol: &str) -> Box<dyn ReportPort> {
    let is_csv = output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(CsvTradeReportAdapter::new())
    } else {
        Box::new(TextReportAdapter::new(symbol))
    }
}

/// File values, then command-line overrides, then the MACD ordering check.
pub fn resolve_backtest_config(
    config: &dyn ConfigPort,
    overrides: &StrategyOverrides,
) -> Result<BacktestConfig, TraderError> {
    let mut bt_config = build_backtest_config(config)?;
    overrides.apply(&mut bt_config);
    warn_on_inverted_macd(&bt_config);
    Ok(bt_config)
}

struct Resolved {
    symbol: String,
    data_dir: PathBuf,
    output: Option<PathBuf>,
    bt_config: BacktestConfig,
}

fn resolve(source: &SourceArgs, overrides: &StrategyOverrides) -> Result<Resolved, TraderError> {
    let config = load_config(&source.config)?;
    let bt_config = resolve_backtest_config(&config, overrides)?;

    Ok(Resolved {
        symbol: resolve_symbol(source.symbol.as_deref(), &config)?,
        data_dir: resolve_data_dir(source.data_dir.as_deref(), &config),
        output: resolve_output(source.output.as_deref(), &config),
        bt_config,
    })
}

fn run_backtest(source: &SourceArgs, overrides: &StrategyOverrides) -> Result<(), TraderError> {
    let resolved = resolve(source, overrides)?;
    let data_port = CsvAdapter::new(resolved.data_dir);
    run_backtest_pipeline(
        &data_port,
        &resolved.symbol,
        &resolved.bt_config,
        resolved.output.as_deref(),
    )?;
    Ok(())
}

/// Fetch, backtest, and report. With no output path the report goes to stdout.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    symbol: &str,
    bt_config: &BacktestConfig,
    output: Option<&Path>,
) -> Result<BacktestResult, TraderError> {
    let series = data_port.fetch_series(symbol)?;
    info!(symbol, bars = series.len(), "loaded price series");

    let result = backtest_engine::run_backtest(&series, bt_config);

    let reporter = report_adapter_for(output, symbol);
    match output {
        Some(path) => {
            reporter.write(&result, bt_config, path)?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{}", reporter.render(&result, bt_config)?),
    }
    Ok(result)
}

fn run_indicators(source: &SourceArgs, overrides: &StrategyOverrides) -> Result<(), TraderError> {
    let resolved = resolve(source, overrides)?;
    let data_port = CsvAdapter::new(resolved.data_dir);
    run_indicators_pipeline(
        &data_port,
        &resolved.symbol,
        &resolved.bt_config,
        resolved.output.as_deref(),
    )?;
    Ok(())
}

pub fn run_indicators_pipeline(
    data_port: &dyn DataPort,
    symbol: &str,
    bt_config: &BacktestConfig,
    output: Option<&Path>,
) -> Result<String, TraderError> {
    let series = data_port.fetch_series(symbol)?;
    let indicators = IndicatorSet::compute(&series, bt_config);
    let table = render_indicator_table(&series, &indicators)?;

    match output {
        Some(path) => {
            std::fs::write(path, &table).map_err(|e| TraderError::Report {
                reason: format!("failed to write {}: {}", path.display(), e),
            })?;
            info!(symbol, path = %path.display(), "indicator table written");
        }
        None => print!("{table}"),
    }
    Ok(table)
}

fn run_validate(config_path: &Path) -> Result<(), TraderError> {
    let config = load_config(config_path)?;
    let bt_config = resolve_backtest_config(&config, &StrategyOverrides::default())?;

    println!(
        "SMA({}) RSI({}) overbought {} MACD({},{},{})",
        bt_config.ma_period,
        bt_config.rsi_period,
        bt_config.rsi_overbought,
        bt_config.macd_fast,
        bt_config.macd_slow,
        bt_config.macd_signal
    );
    match config.get_string("data", "symbol") {
        Some(symbol) => println!("symbol: {symbol}"),
        None => println!("symbol: (none, pass --symbol)"),
    }
    println!(
        "data directory: {}",
        resolve_data_dir(None, &config).display()
    );
    println!("Configuration is valid.");
    Ok(())
}

fn run_list_symbols(data_dir: &Path) -> Result<(), TraderError> {
    let symbols = CsvAdapter::new(data_dir.to_path_buf()).list_symbols()?;
    if symbols.is_empty() {
        info!(dir = %data_dir.display(), "no symbols found");
    }
    for symbol in &symbols {
        println!("{symbol}");
    }
    Ok(())
}
