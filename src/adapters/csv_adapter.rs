//! CSV file price data adapter.
//!
//! One file per symbol, `<base_path>/<symbol>.csv`, with a header row.
//! Columns are located by name; `close` and one of `date`/`timestamp`/`time`
//! are required, `open`/`high`/`low`/`volume` are optional.
//! Rows whose field count differs from the header, or whose timestamp or close
//! cannot be parsed, are skipped.

use crate::domain::error::TraderError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

const TIMESTAMP_COLUMNS: [&str; 3] = ["date", "timestamp", "time"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Default)]
struct Columns {
    timestamp: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Parse a whole CSV document. `source_name` is used in errors and logs.
    pub fn parse_series(content: &str, source_name: &str) -> Result<Vec<PricePoint>, TraderError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| TraderError::DataRead {
                source_name: source_name.to_string(),
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let columns = locate_columns(&headers, source_name)?;

        let mut points = Vec::new();
        let mut skipped = 0usize;

        for (row, result) in rdr.records().enumerate() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    debug!(source = source_name, row, error = %e, "unreadable row");
                    skipped += 1;
                    continue;
                }
            };

            if record.len() != headers.len() {
                skipped += 1;
                continue;
            }

            match parse_record(&record, &columns) {
                Some(point) => points.push(point),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(source = source_name, skipped, kept = points.len(), "skipped malformed rows");
        }

        points.sort_by_key(|p| p.timestamp);
        Ok(points)
    }
}

fn locate_columns(headers: &csv::StringRecord, source_name: &str) -> Result<Columns, TraderError> {
    let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let timestamp = TIMESTAMP_COLUMNS
        .iter()
        .find_map(|&name| find(name))
        .ok_or_else(|| TraderError::DataRead {
            source_name: source_name.to_string(),
            reason: "missing date/timestamp column".into(),
        })?;
    let close = find("close").ok_or_else(|| TraderError::DataRead {
        source_name: source_name.to_string(),
        reason: "missing close column".into(),
    })?;

    Ok(Columns {
        timestamp,
        close,
        open: find("open"),
        high: find("high"),
        low: find("low"),
        volume: find("volume"),
    })
}

fn parse_record(record: &csv::StringRecord, columns: &Columns) -> Option<PricePoint> {
    let timestamp = parse_timestamp(record.get(columns.timestamp)?)?;
    let close: f64 = record.get(columns.close)?.parse().ok()?;
    if !close.is_finite() {
        return None;
    }

    let optional = |idx: Option<usize>| -> Option<f64> {
        idx.and_then(|i| record.get(i)).and_then(|s| s.parse().ok())
    };

    Some(PricePoint {
        timestamp,
        close,
        open: optional(columns.open),
        high: optional(columns.high),
        low: optional(columns.low),
        volume: optional(columns.volume),
    })
}

/// Accepts `YYYY-MM-DD` (midnight) or a date with a time of day.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, symbol: &str) -> Result<Vec<PricePoint>, TraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| TraderError::DataRead {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let points = Self::parse_series(&content, &path.display().to_string())?;
        if points.is_empty() {
            return Err(TraderError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TraderError::DataRead {
            source_name: self.base_path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "Date,Open,High,Low,Close,Volume\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("BHP.csv"), csv_content).unwrap();
        fs::write(path.join("CBA.csv"), "date,close\n").unwrap();
        fs::write(path.join("notes.txt"), "ignored").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_series_returns_sorted_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_series("BHP").unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].timestamp, at(2024, 1, 15));
        assert_eq!(series[1].timestamp, at(2024, 1, 16));
        assert_eq!(series[2].timestamp, at(2024, 1, 17));
        assert_eq!(series[0].close, 105.0);
        assert_eq!(series[0].open, Some(100.0));
        assert_eq!(series[0].high, Some(110.0));
        assert_eq!(series[0].low, Some(90.0));
        assert_eq!(series[0].volume, Some(50000.0));
    }

    #[test]
    fn fetch_series_missing_file_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_series("XYZ").unwrap_err();
        assert!(matches!(err, TraderError::DataRead { .. }));
    }

    #[test]
    fn fetch_series_header_only_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_series("CBA").unwrap_err();
        assert!(matches!(err, TraderError::NoData { symbol } if symbol == "CBA"));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(adapter.list_symbols().unwrap(), vec!["BHP", "CBA"]);
    }

    #[test]
    fn skips_rows_with_wrong_field_count() {
        let content = "date,close\n2024-01-01,10\n2024-01-02,11,extra\n2024-01-03\n2024-01-04,12\n";
        let series = CsvAdapter::parse_series(content, "test").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].close, 10.0);
        assert_eq!(series[1].close, 12.0);
    }

    #[test]
    fn skips_rows_with_bad_values() {
        let content = "date,close\nnot-a-date,10\n2024-01-02,abc\n2024-01-03,NaN\n2024-01-04,12.5\n";
        let series = CsvAdapter::parse_series(content, "test").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].timestamp, at(2024, 1, 4));
    }

    #[test]
    fn close_only_columns() {
        let content = "timestamp,close\n2024-01-01 09:30:00,10\n";
        let series = CsvAdapter::parse_series(content, "test").unwrap();
        assert_eq!(series.len(), 1);
        assert!(series[0].open.is_none());
        assert!(series[0].volume.is_none());
    }

    #[test]
    fn missing_close_column_is_error() {
        let err = CsvAdapter::parse_series("date,open\n2024-01-01,1\n", "test").unwrap_err();
        assert!(matches!(err, TraderError::DataRead { reason, .. } if reason.contains("close")));
    }

    #[test]
    fn missing_timestamp_column_is_error() {
        let err = CsvAdapter::parse_series("close\n1\n", "test").unwrap_err();
        assert!(matches!(err, TraderError::DataRead { reason, .. } if reason.contains("date")));
    }

    #[test]
    fn parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-03-05"), Some(at(2024, 3, 5)));
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-03-05 14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05T14:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-05 14:30"), Some(expected));
        assert_eq!(parse_timestamp("05/03/2024"), None);
    }
}
