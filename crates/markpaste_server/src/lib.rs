//! HTTP server wiring for MarkPaste (routes, handlers, and shared state).

/// HTTP error mapping for handlers.
pub mod error;
/// HTTP handlers for the paste endpoints.
pub mod handlers;

pub use markpaste_core::{
    config, naming, recency, render, service, store, AppError, Config, KvStore, PasteService,
    DEFAULT_PORT,
};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
script-src 'self' 'unsafe-inline' https://cdnjs.cloudflare.com; \
style-src 'self' 'unsafe-inline' https://cdnjs.cloudflare.com https://fonts.googleapis.com; \
font-src 'self' https://fonts.gstatic.com; img-src 'self' data: https:; connect-src 'self'; \
frame-ancestors 'none'; base-uri 'self'; form-action 'self'";

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: PasteService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared state around an open store.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration; `index_capacity` sizes the recency index.
    /// - `store`: Backing key-value store.
    pub fn new(config: Config, store: Arc<dyn KvStore>) -> Self {
        let service = PasteService::new(store, config.index_capacity);
        Self {
            service,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, allow_public_access, cors_port)
}

/// Resolve the listener address from the `BIND` override and security policy.
///
/// Non-loopback addresses are only honored when `allow_public_access` is set;
/// otherwise the port is kept and the host forced to `127.0.0.1`.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    resolve_bind_override(
        std::env::var("BIND").ok().as_deref(),
        config.port,
        allow_public_access,
    )
}

fn resolve_bind_override(
    bind: Option<&str>,
    port: u16,
    allow_public_access: bool,
) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], port));
    let requested = match bind.map(|value| (value, value.trim().parse::<SocketAddr>())) {
        Some((_, Ok(addr))) => addr,
        Some((value, Err(err))) => {
            tracing::warn!(
                "Invalid BIND='{}': {}. Falling back to {}",
                value,
                err,
                default_bind
            );
            default_bind
        }
        None => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn cors_layer(allow_public_access: bool, cors_port: u16) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods([Method::GET, Method::POST]);
    if allow_public_access {
        return cors
            .allow_origin(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any);
    }

    let origins: Vec<HeaderValue> = ["localhost", "127.0.0.1"]
        .iter()
        .filter_map(|host| format!("http://{}:{}", host, cors_port).parse().ok())
        .collect();
    cors.allow_origin(origins)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

fn create_app_with_cors_port(state: AppState, allow_public_access: bool, cors_port: u16) -> Router {
    let max_body = state.config.max_paste_size;

    Router::new()
        .route(
            "/",
            post(handlers::paste::create_paste).fallback(handlers::usage),
        )
        .route(
            "/view/:id",
            get(handlers::paste::view_paste).fallback(handlers::usage),
        )
        .route(
            "/raw/:id",
            get(handlers::paste::raw_paste).fallback(handlers::usage),
        )
        .fallback(handlers::usage)
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(max_body))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(allow_public_access, cors_port))
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    HeaderValue::from_static(CONTENT_SECURITY_POLICY),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, allow_public_access, cors_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
