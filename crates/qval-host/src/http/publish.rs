//! Serves the embedded single-page shell.

use axum::http::{StatusCode, Uri, header};
use axum::response::IntoResponse;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn handler(uri: Uri) -> impl IntoResponse {
    match uri.path() {
        "/" | "/index.html" => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            INDEX_HTML,
        )
            .into_response(),
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
