//! HTTP surface of the recording library
//!
//! Storage work runs on the blocking pool; the library's own mutex serializes
//! it across requests.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info, warn};
use thiserror::Error;

use crate::error::LibraryError;
use crate::models::{EditResponse, Listing, UploadRequest};
use crate::state::Library;

/// Uploads carry the whole recording base64-encoded in one JSON body
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

#[derive(Clone)]
struct AppState {
    library: Arc<Library>,
}

#[derive(Debug, Error)]
enum ApiError {
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Library(LibraryError::InvalidUpload(reason)) => {
                warn!("Rejected upload: {}", reason);
                Json(false).into_response()
            }
            ApiError::Library(LibraryError::NotFound(name)) => {
                warn!("Recording not found: {}", name);
                StatusCode::NOT_FOUND.into_response()
            }
            err => {
                error!("Request failed: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

pub fn router(library: Arc<Library>) -> Router {
    let state = AppState { library };
    Router::new()
        .route("/", get(home))
        .route("/upload", post(upload))
        .route("/edit/:name", get(edit))
        .route("/delete/:name", get(delete))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn home(State(state): State<AppState>) -> Result<Json<Listing>, ApiError> {
    info!("Serving homepage");
    let library = state.library;
    let entries = tokio::task::spawn_blocking(move || library.list()).await??;
    Ok(Json(Listing::from(entries)))
}

async fn upload(State(state): State<AppState>, body: Bytes) -> Result<Json<bool>, ApiError> {
    // Decode everything before taking the lock so bad input never mutates state
    let request = UploadRequest::from_json(&body)?;
    let audio = request.audio()?;

    let library = state.library;
    let name =
        tokio::task::spawn_blocking(move || library.save(&request.name, &audio, request.cut))
            .await??;

    info!("Stored upload: {}", name);
    Ok(Json(true))
}

async fn edit(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<EditResponse>, ApiError> {
    info!("Serving edit data: {}", name);
    let library = state.library;
    let recording = tokio::task::spawn_blocking(move || library.edit(&name)).await??;
    Ok(Json(EditResponse::new(
        recording.name,
        &recording.audio,
        recording.cut,
    )))
}

async fn delete(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Redirect, ApiError> {
    info!("Deleting recording: {}", name);
    let library = state.library;
    tokio::task::spawn_blocking(move || library.delete(&name)).await??;
    Ok(Redirect::temporary("/"))
}
