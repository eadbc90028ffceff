use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::alphavantage::RawBar;
use crate::models::{ChartData, SeriesPoint};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    #[error("no data points between {start} and {end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
}

/// Parse the calendar date out of a date stamp.
/// Intraday stamps carry a time of day ("2024-01-02 15:00:00"); only the date is kept.
pub fn parse_stamp_date(stamp: &str) -> Option<NaiveDate> {
    let date_part = stamp.split_whitespace().next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Build a point from one entry, or None if any field fails to parse
pub fn parse_entry(date: NaiveDate, value: &Value) -> Option<SeriesPoint> {
    let bar = RawBar::deserialize(value).ok()?;
    Some(SeriesPoint {
        date,
        open: bar.open,
        high: bar.high,
        low: bar.low,
        close: bar.close,
    })
}

/// Keep the entries dated within `start..=end` and split them into parallel
/// series. Entries that fail to parse are dropped and counted in `skipped`.
pub fn extract(
    entries: &BTreeMap<String, Value>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ChartData, SeriesError> {
    let mut data = ChartData::default();

    // BTreeMap iterates in lexical order, which is chronological for these stamps
    for (stamp, value) in entries {
        let Some(date) = parse_stamp_date(stamp) else {
            data.skipped += 1;
            continue;
        };

        if date < start || date > end {
            continue;
        }

        match parse_entry(date, value) {
            Some(point) => data.push(point),
            None => data.skipped += 1,
        }
    }

    if data.skipped > 0 {
        warn!("Skipped {} malformed series entries", data.skipped);
    }

    if data.is_empty() {
        return Err(SeriesError::EmptyRange { start, end });
    }

    debug!("Kept {} of {} series entries", data.len(), entries.len());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bar(close: f64) -> Value {
        json!({
            "1. open": format!("{:.4}", close - 1.0),
            "2. high": format!("{:.4}", close + 1.0),
            "3. low": format!("{:.4}", close - 2.0),
            "4. close": format!("{:.4}", close),
            "5. volume": "1000"
        })
    }

    fn five_days() -> BTreeMap<String, Value> {
        (1..=5)
            .map(|day| (format!("2024-01-{:02}", day), bar(100.0 + day as f64)))
            .collect()
    }

    #[test]
    fn test_filter_is_inclusive_and_ordered() {
        let data = extract(&five_days(), date(2024, 1, 2), date(2024, 1, 4)).unwrap();

        assert_eq!(data.labels, vec!["2024-01-02", "2024-01-03", "2024-01-04"]);
        assert_eq!(data.close, vec![102.0, 103.0, 104.0]);
        assert_eq!(data.open, vec![101.0, 102.0, 103.0]);
        assert_eq!(data.high, vec![103.0, 104.0, 105.0]);
        assert_eq!(data.low, vec![100.0, 101.0, 102.0]);
        assert_eq!(data.skipped, 0);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let entries = five_days();
        let first = extract(&entries, date(2024, 1, 1), date(2024, 1, 5)).unwrap();
        let second = extract(&entries, date(2024, 1, 1), date(2024, 1, 5)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_intraday_stamps_use_date_part() {
        let mut entries = BTreeMap::new();
        entries.insert("2024-01-02 10:00:00".to_string(), bar(10.0));
        entries.insert("2024-01-02 11:00:00".to_string(), bar(11.0));
        entries.insert("2024-01-03 10:00:00".to_string(), bar(12.0));

        let data = extract(&entries, date(2024, 1, 2), date(2024, 1, 2)).unwrap();
        assert_eq!(data.labels, vec!["2024-01-02", "2024-01-02"]);
        assert_eq!(data.close, vec![10.0, 11.0]);
    }

    #[test]
    fn test_malformed_entries_are_skipped_and_counted() {
        let mut entries = five_days();
        entries.insert("not-a-date".to_string(), bar(1.0));
        entries.insert("2024-01-03".to_string(), json!({ "1. open": "x" }));

        let data = extract(&entries, date(2024, 1, 1), date(2024, 1, 5)).unwrap();
        assert_eq!(data.len(), 4);
        assert!(!data.labels.contains(&"2024-01-03".to_string()));
        assert_eq!(data.skipped, 2);
        assert_eq!(data.open.len(), data.close.len());
    }

    #[test]
    fn test_bad_prices_outside_range_are_not_counted() {
        let mut entries = five_days();
        entries.insert("2023-12-31".to_string(), json!("garbage"));

        let data = extract(&entries, date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.skipped, 0);
    }

    #[test]
    fn test_empty_range_is_an_error() {
        let err = extract(&five_days(), date(2023, 6, 1), date(2023, 6, 30)).unwrap_err();
        assert_eq!(
            err,
            SeriesError::EmptyRange {
                start: date(2023, 6, 1),
                end: date(2023, 6, 30)
            }
        );
    }

    #[test]
    fn test_parse_stamp_date() {
        assert_eq!(parse_stamp_date("2024-02-29"), Some(date(2024, 2, 29)));
        assert_eq!(parse_stamp_date("2024-02-29 16:00:00"), Some(date(2024, 2, 29)));
        assert_eq!(parse_stamp_date("2023-02-29"), None);
        assert_eq!(parse_stamp_date(""), None);
    }
}
