//! Price series representation.

use chrono::NaiveDateTime;

/// One bar of a price series. Only `timestamp` and `close` feed the indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume: Option<f64>,
}

impl PricePoint {
    pub fn new(timestamp: NaiveDateTime, close: f64) -> Self {
        Self {
            timestamp,
            close,
            open: None,
            high: None,
            low: None,
            volume: None,
        }
    }
}

/// Close prices of a series, in order.
pub fn closes(series: &[PricePoint]) -> Vec<f64> {
    series.iter().map(|p| p.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn new_leaves_optional_fields_empty() {
        let p = PricePoint::new(ts(2), 101.5);
        assert_eq!(p.timestamp, ts(2));
        assert_relative_eq!(p.close, 101.5);
        assert!(p.open.is_none());
        assert!(p.high.is_none());
        assert!(p.low.is_none());
        assert!(p.volume.is_none());
    }

    #[test]
    fn closes_preserves_order() {
        let series = vec![
            PricePoint::new(ts(1), 3.0),
            PricePoint::new(ts(2), 1.0),
            PricePoint::new(ts(3), 2.0),
        ];
        assert_eq!(closes(&series), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn closes_empty() {
        assert!(closes(&[]).is_empty());
    }
}
