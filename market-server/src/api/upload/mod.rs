//! Listing Images
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/uploads | POST | producer or admin |
//! | /uploads/{filename} | GET | none |

mod handler;

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use http::header;

use crate::auth::{Operation, require_operation};
use crate::core::ServerState;

pub use handler::UploadResponse;

enum StoredFile {
    Found(&'static str, Bytes),
    NotFound,
    BadName,
}

impl IntoResponse for StoredFile {
    fn into_response(self) -> axum::response::Response {
        match self {
            StoredFile::Found(mime, content) => {
                (http::StatusCode::OK, [(header::CONTENT_TYPE, mime)], content).into_response()
            }
            StoredFile::NotFound => (http::StatusCode::NOT_FOUND, "File not found").into_response(),
            StoredFile::BadName => {
                (http::StatusCode::BAD_REQUEST, "Invalid filename").into_response()
            }
        }
    }
}

/// Names are flat content hashes; anything that could leave the directory is refused
fn is_safe_name(filename: &str) -> bool {
    !(filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\'))
}

async fn serve_upload(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> StoredFile {
    if !is_safe_name(&filename) {
        tracing::warn!(filename = %filename, "Rejected upload path");
        return StoredFile::BadName;
    }

    let path = state.config.uploads_dir().join(&filename);
    match tokio::fs::read(&path).await {
        Ok(content) => {
            let mime = mime_guess::from_path(&path)
                .first_raw()
                .unwrap_or("application/octet-stream");
            StoredFile::Found(mime, content.into())
        }
        Err(e) => {
            tracing::debug!(filename = %filename, error = %e, "Upload not found");
            StoredFile::NotFound
        }
    }
}

pub fn router() -> Router<ServerState> {
    let upload = Router::new()
        .route("/api/uploads", post(handler::upload))
        .layer(middleware::from_fn(require_operation(Operation::UploadImage)));

    Router::new()
        .route("/uploads/{filename}", get(serve_upload))
        .merge(upload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_names_are_refused() {
        assert!(is_safe_name("3f2a.jpg"));
        assert!(!is_safe_name(""));
        assert!(!is_safe_name("../market.db"));
        assert!(!is_safe_name("a/b.jpg"));
        assert!(!is_safe_name("a\\b.jpg"));
    }
}
