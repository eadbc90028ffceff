use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use super::models::{ApiError, RawSeriesResponse};
use crate::models::SeriesFunction;
use tracing::{debug, warn};

/// Alpha Vantage query client for historical price series
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl AlphaVantageClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.alphavantage.co/query";

    /// Create a client against `base_url` (the public endpoint, a proxy, or a test server)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query parameters for one series request
    fn query_params(&self, symbol: &str, function: SeriesFunction) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("function", function.api_name().to_string()),
            ("symbol", symbol.to_string()),
            ("apikey", self.api_key.clone()),
            ("datatype", "json".to_string()),
        ];

        if let Some(interval) = function.interval() {
            params.push(("interval", interval.to_string()));
        }

        params
    }

    /// Map a non-200 response to an error
    async fn handle_error_response(
        status: StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        match status_code {
            429 => {
                warn!("Alpha Vantage rate limited the request");
                ApiError::RateLimited(body_text)
            }
            500..=599 => {
                warn!("Server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, body_text)
            }
            _ => {
                warn!("Unexpected status {} from Alpha Vantage", status_code);
                ApiError::HttpError(status_code, body_text)
            }
        }
    }

    /// GET /query?function=...&symbol=...
    ///
    /// Fetches the raw time series payload for a symbol. The body is returned
    /// as-is on a 200; classifying it is left to `SeriesPayload::parse`.
    ///
    /// # Returns
    /// * `Ok(RawSeriesResponse)` - JSON object from the API
    /// * `Err(ApiError)` - non-200 status, transport failure or non-object body
    pub async fn fetch_series(
        &self,
        symbol: &str,
        function: SeriesFunction,
    ) -> Result<RawSeriesResponse, ApiError> {
        debug!("Fetching {} for {}", function.api_name(), symbol);

        let response = self.http_client
            .get(&self.base_url)
            .query(&self.query_params(symbol, function))
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<RawSeriesResponse>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }
}
