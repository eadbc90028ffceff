//! Runtime configuration loaded from environment variables

use std::path::PathBuf;
use std::str::FromStr;

use crate::api::alphavantage::AlphaVantageClient;
use crate::services::chart_service::ChartOutput;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Application settings, built once at startup and shared with the handlers
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`; charts go in its `charts` subdirectory
    pub static_dir: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
    pub chart_retention: usize,
}

impl AppConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup (the environment in production, a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ALPHAVANTAGE_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("ALPHAVANTAGE_API_KEY"))?;

        Ok(Self {
            api_key,
            api_base_url: lookup("ALPHAVANTAGE_BASE_URL")
                .unwrap_or_else(|| AlphaVantageClient::DEFAULT_BASE_URL.to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 5000)?,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            chart_width: parse_or(&lookup, "CHART_WIDTH", 1024)?,
            chart_height: parse_or(&lookup, "CHART_HEIGHT", 600)?,
            chart_retention: parse_or(&lookup, "CHART_RETENTION", 50)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn chart_output(&self) -> ChartOutput {
        ChartOutput {
            dir: self.static_dir.join("charts"),
            url_prefix: "/static/charts".to_string(),
            width: self.chart_width,
            height: self.chart_height,
            retention: self.chart_retention,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
