use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, Html, IntoResponse, Response};

use crate::models::PageContext;
use crate::utils::{clear_flash_cookie, read_flash, render_page};

/// GET / - the form, plus any flash message left by a failed submission
pub async fn execute(headers: HeaderMap) -> Response {
    match read_flash(&headers) {
        Some(message) => {
            tracing::debug!("Showing flash message: {}", message);
            let page = render_page(&PageContext::with_flash(Some(message)));
            (AppendHeaders([(SET_COOKIE, clear_flash_cookie())]), Html(page)).into_response()
        }
        None => Html(render_page(&PageContext::default())).into_response(),
    }
}
