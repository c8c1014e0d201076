//! HTTP request handlers.

/// Paste create/view/raw endpoints.
pub mod paste;

use axum::{http::header, response::IntoResponse};

/// Plain-text instructions returned for any unrouted path or method.
pub const USAGE_TEXT: &str = "Send a POST request to / with Markdown in the body to create a paste.\n\
The response is a link to the rendered page at /view/<id>; the raw text is at /raw/<id>.\n";

/// Fallback handler describing how to use the service.
pub async fn usage() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], USAGE_TEXT)
}
