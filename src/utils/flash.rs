//! One-shot flash messages carried in a cookie across the redirect

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};

pub const FLASH_COOKIE: &str = "flash";

/// Redirect to `location` with `message` queued for the next page view
pub fn redirect_with_flash(location: &str, message: &str) -> Response {
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        urlencoding::encode(message)
    );
    (AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(location)).into_response()
}

/// Cookie value that expires the flash immediately
pub fn clear_flash_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0", FLASH_COOKIE)
}

/// Read the pending flash message from the request cookies
pub fn read_flash(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|message| message.into_owned())
        .filter(|message| !message.is_empty())
}
