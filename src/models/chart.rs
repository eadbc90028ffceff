//! Chart request and series models

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;

/// Raw form submission from the chart page.
///
/// Every field defaults to an empty string so a missing input surfaces as a
/// validation message instead of a rejected request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChartForm {
    pub symbol: String,
    pub chart_type: String,
    pub time_series: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartType {
    Bar,
    Line,
}

impl ChartType {
    /// Anything other than "Bar" is drawn as a line chart
    pub fn from_form(value: &str) -> Self {
        if value.trim() == "Bar" {
            ChartType::Bar
        } else {
            ChartType::Line
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar",
            ChartType::Line => "Line",
        }
    }
}

/// Alpha Vantage time series function (granularity of the price history)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesFunction {
    Intraday,
    Daily,
    Weekly,
    Monthly,
}

impl SeriesFunction {
    pub const ALL: [SeriesFunction; 4] = [
        SeriesFunction::Intraday,
        SeriesFunction::Daily,
        SeriesFunction::Weekly,
        SeriesFunction::Monthly,
    ];

    /// Identifier sent as the `function` query parameter
    pub fn api_name(&self) -> &'static str {
        match self {
            SeriesFunction::Intraday => "TIME_SERIES_INTRADAY",
            SeriesFunction::Daily => "TIME_SERIES_DAILY",
            SeriesFunction::Weekly => "TIME_SERIES_WEEKLY",
            SeriesFunction::Monthly => "TIME_SERIES_MONTHLY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeriesFunction::Intraday => "Intraday (60min)",
            SeriesFunction::Daily => "Daily",
            SeriesFunction::Weekly => "Weekly",
            SeriesFunction::Monthly => "Monthly",
        }
    }

    /// Only the intraday function takes an `interval` parameter
    pub fn interval(&self) -> Option<&'static str> {
        match self {
            SeriesFunction::Intraday => Some("60min"),
            _ => None,
        }
    }
}

impl FromStr for SeriesFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        SeriesFunction::ALL
            .into_iter()
            .find(|f| f.api_name() == value)
            .ok_or_else(|| value.to_string())
    }
}

/// A validated chart request. `start_date <= end_date <= today` holds once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub symbol: String,
    pub chart_type: ChartType,
    pub series_function: SeriesFunction,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// One OHLC record parsed out of the upstream payload
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Parallel label/price sequences in ascending date order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    /// Entries dropped because their date or prices failed to parse
    pub skipped: usize,
}

impl ChartData {
    pub fn push(&mut self, point: SeriesPoint) {
        self.labels.push(point.date.format("%Y-%m-%d").to_string());
        self.open.push(point.open);
        self.high.push(point.high);
        self.low.push(point.low);
        self.close.push(point.close);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Named series in plotting order
    pub fn series(&self) -> [(&'static str, &[f64]); 4] {
        [
            ("Open", self.open.as_slice()),
            ("High", self.high.as_slice()),
            ("Low", self.low.as_slice()),
            ("Close", self.close.as_slice()),
        ]
    }
}

/// SVG chart written to disk for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub path: PathBuf,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_type_defaults_to_line() {
        assert_eq!(ChartType::from_form("Bar"), ChartType::Bar);
        assert_eq!(ChartType::from_form("Line"), ChartType::Line);
        assert_eq!(ChartType::from_form("pie"), ChartType::Line);
    }

    #[test]
    fn test_series_function_from_api_name() {
        assert_eq!(
            "TIME_SERIES_DAILY".parse::<SeriesFunction>(),
            Ok(SeriesFunction::Daily)
        );
        assert_eq!(
            "TIME_SERIES_INTRADAY".parse::<SeriesFunction>(),
            Ok(SeriesFunction::Intraday)
        );
        assert!("TIME_SERIES_YEARLY".parse::<SeriesFunction>().is_err());
    }

    #[test]
    fn test_only_intraday_has_interval() {
        assert_eq!(SeriesFunction::Intraday.interval(), Some("60min"));
        assert_eq!(SeriesFunction::Daily.interval(), None);
        assert_eq!(SeriesFunction::Weekly.interval(), None);
        assert_eq!(SeriesFunction::Monthly.interval(), None);
    }

    #[test]
    fn test_push_keeps_sequences_aligned() {
        let mut data = ChartData::default();
        data.push(SeriesPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
        });

        assert_eq!(data.len(), 1);
        assert_eq!(data.labels, vec!["2024-01-02".to_string()]);
        let names: Vec<&str> = data.series().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["Open", "High", "Low", "Close"]);
    }
}
