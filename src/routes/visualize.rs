use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;

use super::AppState;
use crate::models::{ChartForm, PageContext};
use crate::services::visualize_service;
use crate::utils::{redirect_with_flash, render_page};

/// POST /visualize - validate the form, build the chart and show it
pub async fn execute(State(state): State<Arc<AppState>>, Form(form): Form<ChartForm>) -> Response {
    tracing::info!(
        "📈 Chart requested: symbol={:?} type={:?} series={:?} range={:?}..{:?}",
        form.symbol,
        form.chart_type,
        form.time_series,
        form.start_date,
        form.end_date
    );

    let today = chrono::Local::now().date_naive();

    let request = match visualize_service::validate(&form, today) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("Rejected chart form: {}", e);
            return redirect_with_flash("/", &e.to_string());
        }
    };

    match visualize_service::visualize(&state.client, &state.chart_output, &request).await {
        Ok(view) => Html(render_page(&PageContext::with_chart(view))).into_response(),
        Err(e) => redirect_with_flash("/", &e.to_string()),
    }
}
