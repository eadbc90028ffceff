//! Page view models

use chrono::NaiveDate;

/// Chart section shown after a successful request
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub chart_url: String,
    pub skipped: usize,
}

/// Everything the page template needs. A chart is present when `chart` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContext {
    pub flash: Option<String>,
    pub chart: Option<ChartView>,
}

impl PageContext {
    pub fn with_flash(flash: Option<String>) -> Self {
        Self { flash, chart: None }
    }

    pub fn with_chart(chart: ChartView) -> Self {
        Self {
            flash: None,
            chart: Some(chart),
        }
    }
}
