//! Data models for the chart page and services
//!
//! Request, series and view structs passed between the routes and services.

pub mod chart;
pub mod page;

// Re-export commonly used types for convenience
pub use chart::{
    ChartData, ChartForm, ChartRequest, ChartType, RenderedChart, SeriesFunction, SeriesPoint,
};
pub use page::{ChartView, PageContext};
