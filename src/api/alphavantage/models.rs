use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Untyped JSON object exactly as the query endpoint returned it
pub type RawSeriesResponse = Map<String, Value>;

/// Substring that identifies the time series object in a response
pub const TIME_SERIES_MARKER: &str = "Time Series";

const ERROR_MESSAGE_KEY: &str = "Error Message";
const NOTICE_KEYS: [&str; 2] = ["Note", "Information"];

/// Typed view of a query response.
///
/// Alpha Vantage answers 200 for bad symbols and throttled keys alike, so the
/// body has to be classified before any data is read from it.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesPayload {
    /// `"Error Message"`: unknown symbol or bad function
    ErrorMessage(String),
    /// `"Note"` / `"Information"`: call frequency or plan limit notice
    Notice(String),
    /// Date stamp -> OHLC record, ordered by date stamp
    TimeSeries {
        key: String,
        entries: BTreeMap<String, Value>,
    },
    /// `{}`: nothing at all came back for the symbol
    Empty,
    Unrecognized,
}

impl SeriesPayload {
    pub fn parse(mut raw: RawSeriesResponse) -> Self {
        if raw.is_empty() {
            return SeriesPayload::Empty;
        }

        if let Some(message) = raw.remove(ERROR_MESSAGE_KEY) {
            return SeriesPayload::ErrorMessage(value_text(message));
        }

        for key in NOTICE_KEYS {
            if let Some(notice) = raw.remove(key) {
                return SeriesPayload::Notice(value_text(notice));
            }
        }

        match raw.into_iter().find(|(key, _)| key.contains(TIME_SERIES_MARKER)) {
            Some((key, Value::Object(entries))) => SeriesPayload::TimeSeries {
                key,
                entries: entries.into_iter().collect(),
            },
            _ => SeriesPayload::Unrecognized,
        }
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// One OHLC record. Prices arrive as strings ("187.1500") but plain numbers
/// are accepted too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawBar {
    #[serde(rename = "1. open", deserialize_with = "deserialize_price")]
    pub open: f64,
    #[serde(rename = "2. high", deserialize_with = "deserialize_price")]
    pub high: f64,
    #[serde(rename = "3. low", deserialize_with = "deserialize_price")]
    pub low: f64,
    #[serde(rename = "4. close", deserialize_with = "deserialize_price")]
    pub close: f64,
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    let price = match Price::deserialize(deserializer)? {
        Price::Number(n) => n,
        Price::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid price '{}': {}", text, e)))?,
    };

    if price.is_finite() {
        Ok(price)
    } else {
        Err(serde::de::Error::custom("price is not a finite number"))
    }
}

/// Comprehensive error type for API operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// 429 Too Many Requests
    #[error("Rate Limited ({0})")]
    RateLimited(String),
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other non-200 statuses
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Body was not a JSON object
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}
