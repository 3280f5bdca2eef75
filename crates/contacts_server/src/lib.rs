//! HTTP front for the contacts store.
//!
//! `build_router` wires the JSON API under `/api/contacts`, the static
//! front-end, and the middleware stack around one shared [`ContactStore`].

pub mod config;
pub mod http;

pub use config::{ConfigError, ServerConfig};

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use contacts_core::ContactStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContactStore>,
    pub static_dir: PathBuf,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(store: ContactStore, config: &ServerConfig) -> Self {
        Self {
            store: Arc::new(store),
            static_dir: config.static_dir.clone(),
            max_body_bytes: config.max_body_bytes,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/contacts",
            get(http::handlers::list_contacts).post(http::handlers::create_contact),
        )
        .route(
            "/api/contacts/:id",
            get(http::handlers::get_contact)
                .put(http::handlers::update_contact)
                .delete(http::handlers::delete_contact),
        )
        .layer(from_fn(http::middleware::cors_middleware));

    let max_body_bytes = state.max_body_bytes;
    Router::new()
        .route("/", get(http::assets::index))
        .route("/js/*path", get(http::assets::script))
        .route("/css/*path", get(http::assets::stylesheet))
        .merge(api)
        .layer(from_fn(http::middleware::access_log_middleware))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
