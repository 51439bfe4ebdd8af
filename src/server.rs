//! HTTP surface.
//!
//! A thin axum layer over [`archive`](crate::archive): pull file parts out of
//! the multipart body, check names, run the synchronous pipeline on the
//! blocking pool, and stream the finished ZIP back as an attachment.
//!
//! | Route | Field | Success |
//! |---|---|---|
//! | `GET /` | | upload form |
//! | `GET /healthz` | | `ok` |
//! | `POST /split` | `image` | `{base}-splited.zip` |
//! | `POST /split-batch` | `images` (repeated) | `carrosseis-splited-{n}imgs-{m}parts.zip` |
//!
//! Every failure is a JSON body `{"error": "..."}`: 400 for client mistakes,
//! 413 for oversized bodies, 500 when images could not be processed.

use crate::archive::{ArchiveError, Upload, assemble_batch, split_single};
use crate::config::{ConfigError, ServerConfig};
use crate::naming::{ValidationError, batch_archive_name, is_allowed, validate_upload_name};
use crate::page;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::task;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error returned by a handler, rendered as `{"error": message}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{message}")]
    Upload { status: StatusCode, message: String },
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upload { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::Upload {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        Self::Upload {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<ArchiveError> for ApiError {
    fn from(e: ArchiveError) -> Self {
        match e {
            ArchiveError::Validation(v) => v.into(),
            other => Self::Internal(format!("Error processing image(s): {other}")),
        }
    }
}

impl From<task::JoinError> for ApiError {
    fn from(e: task::JoinError) -> Self {
        Self::Internal(format!("Processing task failed: {e}"))
    }
}

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
}

/// Build the application router for `config`.
pub fn router(config: ServerConfig) -> Router {
    let body_limit = config.limits.max_upload_bytes;
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/split", post(split))
        .route("/split-batch", post(split_batch))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServeError> {
    let addr = config.socket_addr()?;
    info!(
        strip_width = config.splitting.strip_width.value(),
        max_upload_bytes = config.limits.max_upload_bytes,
        "starting server"
    );

    let app = router(config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::render_index(state.config.splitting.strip_width).into_string())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn split(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let uploads = read_files(multipart?, "image").await?;
    let upload = uploads
        .into_iter()
        .next()
        .ok_or(ValidationError::Missing)?;
    validate_upload_name(upload.filename.as_deref())?;

    let strip_width = state.config.splitting.strip_width;
    let archive = task::spawn_blocking(move || split_single(&upload, strip_width)).await??;

    Ok(zip_response(archive.bytes, &archive.download_name))
}

async fn split_batch(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let uploads = read_files(multipart?, "images").await?;
    if uploads.is_empty() {
        return Err(ApiError::BadRequest("no images were sent".into()));
    }
    if !uploads
        .iter()
        .any(|u| u.filename.as_deref().is_some_and(is_allowed))
    {
        return Err(ApiError::BadRequest(
            "no image with a supported format was found".into(),
        ));
    }

    let strip_width = state.config.splitting.strip_width;
    let batch = task::spawn_blocking(move || assemble_batch(&uploads, strip_width)).await??;

    let name = batch_archive_name(batch.images_processed, batch.total_strips);
    Ok(zip_response(batch.bytes, &name))
}

/// Collect every file part named `field_name`, in body order.
///
/// Parts without a filename are plain form fields and are ignored.
async fn read_files(mut multipart: Multipart, field_name: &str) -> Result<Vec<Upload>, ApiError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let bytes = field.bytes().await?;
        uploads.push(Upload {
            filename: Some(filename),
            bytes: bytes.to_vec(),
        });
    }
    Ok(uploads)
}

fn zip_response(bytes: Vec<u8>, download_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{download_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        let err: ApiError = ValidationError::EmptyName.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn archive_errors_map_to_status() {
        let err: ApiError =
            ArchiveError::Validation(ValidationError::UnsupportedExtension("txt".into())).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = ArchiveError::NothingProcessed(2).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("could be processed"));
    }

    #[test]
    fn zip_response_sets_attachment_headers() {
        let response = zip_response(vec![1, 2, 3], "foo-splited.zip");
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/zip");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"foo-splited.zip\""
        );
    }
}
