use chrono::NaiveDate;
use tracing::{info, warn};

use crate::api::alphavantage::{AlphaVantageClient, SeriesPayload};
use crate::models::{ChartForm, ChartRequest, ChartType, ChartView, SeriesFunction};
use crate::services::chart_service::{self, ChartOutput};
use crate::services::series_service;
use crate::utils::VisualizeError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Strict `YYYY-MM-DD`: no surrounding whitespace, signs or short fields
fn parse_form_date(value: &str) -> Result<NaiveDate, VisualizeError> {
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(VisualizeError::InvalidDateFormat);
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| VisualizeError::InvalidDateFormat)
}

/// Validate the submitted form against `today`.
///
/// Checks run in a fixed order: date format, date ordering, future dates,
/// then symbol and series function.
pub fn validate(form: &ChartForm, today: NaiveDate) -> Result<ChartRequest, VisualizeError> {
    let start_date = parse_form_date(&form.start_date)?;
    let end_date = parse_form_date(&form.end_date)?;

    if start_date > end_date {
        return Err(VisualizeError::StartAfterEnd);
    }

    if start_date > today || end_date > today {
        return Err(VisualizeError::FutureDate);
    }

    let symbol = form.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(VisualizeError::MissingSymbol);
    }

    let series_function = form
        .time_series
        .parse::<SeriesFunction>()
        .map_err(VisualizeError::UnsupportedSeries)?;

    Ok(ChartRequest {
        symbol,
        chart_type: ChartType::from_form(&form.chart_type),
        series_function,
        start_date,
        end_date,
    })
}

/// Fetch, filter and render the chart for a validated request
pub async fn visualize(
    client: &AlphaVantageClient,
    output: &ChartOutput,
    request: &ChartRequest,
) -> Result<ChartView, VisualizeError> {
    let symbol = &request.symbol;

    let raw = client
        .fetch_series(symbol, request.series_function)
        .await
        .map_err(|e| {
            warn!("Market data request for {} failed: {}", symbol, e);
            VisualizeError::InvalidSymbol(symbol.clone())
        })?;

    let entries = match SeriesPayload::parse(raw) {
        SeriesPayload::TimeSeries { key, entries } => {
            info!("Received '{}' with {} entries for {}", key, entries.len(), symbol);
            entries
        }
        SeriesPayload::ErrorMessage(message) | SeriesPayload::Notice(message) => {
            warn!("Alpha Vantage rejected {}: {}", symbol, message);
            return Err(VisualizeError::InvalidSymbol(symbol.clone()));
        }
        SeriesPayload::Empty => {
            warn!("Empty response for {}", symbol);
            return Err(VisualizeError::InvalidSymbol(symbol.clone()));
        }
        SeriesPayload::Unrecognized => {
            warn!("No time series in response for {}", symbol);
            return Err(VisualizeError::NoSeriesData(symbol.clone()));
        }
    };

    let data = series_service::extract(&entries, request.start_date, request.end_date)
        .map_err(|e| {
            info!("{} for {}", e, symbol);
            VisualizeError::EmptyRange
        })?;

    let chart = chart_service::render(request.chart_type, symbol, &data, output).map_err(|e| {
        warn!("Chart rendering for {} failed: {}", symbol, e);
        VisualizeError::RenderFailed
    })?;
    info!("Chart for {} written to {}", symbol, chart.path.display());

    Ok(ChartView {
        symbol: symbol.clone(),
        start: request.start_date,
        end: request.end_date,
        chart_url: chart.url,
        skipped: data.skipped,
    })
}
