//! Static front-end files served from the configured asset directory.

use crate::AppState;
use axum::extract::{Path as UrlPath, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use log::warn;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

pub async fn index(State(state): State<AppState>) -> Response {
    serve_file(state.static_dir.join("index.html")).await
}

pub async fn script(State(state): State<AppState>, UrlPath(path): UrlPath<String>) -> Response {
    serve_under(&state.static_dir, "js", &path).await
}

pub async fn stylesheet(
    State(state): State<AppState>,
    UrlPath(path): UrlPath<String>,
) -> Response {
    serve_under(&state.static_dir, "css", &path).await
}

async fn serve_under(static_dir: &Path, subdir: &str, requested: &str) -> Response {
    match resolve_asset_path(&static_dir.join(subdir), requested) {
        Some(file) => serve_file(file).await,
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Joins `requested` under `root`, refusing anything that could escape it.
pub fn resolve_asset_path(root: &Path, requested: &str) -> Option<PathBuf> {
    if requested.is_empty() || requested.contains('\\') {
        return None;
    }
    let mut resolved = root.to_path_buf();
    for segment in requested.split('/') {
        if segment.is_empty() {
            return None;
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => resolved.push(part),
            _ => return None,
        }
    }
    Some(resolved)
}

async fn serve_file(file: PathBuf) -> Response {
    match tokio::fs::read(&file).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&file).first_or_octet_stream();
            let content_type = HeaderValue::from_str(mime.essence_str())
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
            ([(CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(err) if err.kind() == ErrorKind::NotFound => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            warn!(
                "event=static_read module=http status=error path={} error={err}",
                file.display()
            );
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
