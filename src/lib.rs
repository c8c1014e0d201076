//! Root crate facade for the MarkPaste server.

pub use markpaste_server::{
    config, create_app, error, handlers, naming, recency, render, resolve_bind_address,
    serve_router, service, store, AppError, AppState, Config, KvStore, PasteService,
    DEFAULT_PORT,
};
