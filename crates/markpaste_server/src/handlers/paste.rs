//! Paste HTTP handlers.

use crate::{error::HttpError, render, AppError, AppState, Config};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Origin used to build the paste URL returned from `POST /`.
///
/// Prefers the configured public URL, then the request's `Host` header, then
/// the loopback address on the configured port.
pub(crate) fn request_origin(config: &Config, headers: &HeaderMap) -> String {
    if let Some(public_url) = config.public_url.as_deref() {
        return public_url.to_string();
    }

    let scheme = match headers
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
    {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };
    match headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|host| !host.is_empty())
    {
        Some(host) => format!("{}://{}", scheme, host),
        None => format!("http://127.0.0.1:{}", config.port),
    }
}

fn map_body_rejection(rejection: BytesRejection, limit: usize) -> HttpError {
    match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => HttpError::PayloadTooLarge { limit },
        status => HttpError::Rejected {
            status,
            message: rejection.body_text(),
        },
    }
}

/// Create a paste from the raw request body.
///
/// Bytes that are not valid UTF-8 are stored as U+FFFD replacement characters.
///
/// # Returns
/// The absolute `/view/<id>` URL as `text/plain`.
///
/// # Errors
/// Returns `413` for bodies over `max_paste_size` and `500` when the content
/// cannot be stored.
pub async fn create_paste(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, HttpError> {
    let body = body.map_err(|rejection| {
        map_body_rejection(rejection, state.config.max_paste_size)
    })?;
    let content = String::from_utf8_lossy(&body);

    let id = state.service.create(&content).await?;
    let url = format!("{}/view/{}", request_origin(&state.config, &headers), id);
    tracing::info!("Created paste {} ({} bytes)", id, body.len());
    Ok(([(header::CONTENT_TYPE, "text/plain")], url).into_response())
}

/// Render a paste as an HTML page.
///
/// Missing pastes get a `404` placeholder page and store failures a `500`
/// placeholder page, never an error body.
pub async fn view_paste(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.service.read(&id).await {
        Ok(Some(content)) => Html(render::render_view(&content)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Html(render::render_missing())).into_response(),
        Err(err) => {
            tracing::error!("Failed to load paste {} for view: {}", id, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::render_unavailable()),
            )
                .into_response()
        }
    }
}

/// Return a paste's content verbatim.
///
/// # Errors
/// Returns `404` when the paste does not exist and `500` on store failure.
pub async fn raw_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    let content = state.service.read(&id).await?.ok_or(AppError::NotFound)?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content).into_response())
}
