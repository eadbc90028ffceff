/// Every way a chart request can fail, worded for the flash message.
///
/// None of these are fatal; the handler turns each one into a redirect back
/// to the form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisualizeError {
    #[error("Invalid date format. Please use YYYY-MM-DD.")]
    InvalidDateFormat,
    #[error("Start date must be before end date.")]
    StartAfterEnd,
    #[error("Dates cannot be in the future. Please select a valid date range.")]
    FutureDate,
    #[error("Please enter a stock symbol.")]
    MissingSymbol,
    #[error("Unsupported time series '{0}'.")]
    UnsupportedSeries(String),
    #[error("'{0}' is not a valid stock symbol. Please try again.")]
    InvalidSymbol(String),
    #[error("No data available for '{0}'. Please try another stock.")]
    NoSeriesData(String),
    #[error("No data available in the selected date range.")]
    EmptyRange,
    #[error("Failed to render chart. Please try again.")]
    RenderFailed,
}
