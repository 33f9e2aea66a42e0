//! Request handlers for the four queue endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use chunkflow_core::Error;
use serde::Deserialize;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReadParams {
    pub off: u64,
    #[serde(rename = "maxSize")]
    pub max_size: u64,
    pub chunk: String,
}

#[derive(Debug, Deserialize)]
pub struct AckParams {
    pub chunk: String,
}

pub async fn write(State(state): State<AppState>, body: Bytes) -> Response {
    match state.storage.write(&body).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => storage_error(err),
    }
}

pub async fn read(
    State(state): State<AppState>,
    Query(params): Query<ReadParams>,
) -> Response {
    if params.chunk.is_empty() {
        return bad_request("bad `chunk` GET param: chunk name must be provided");
    }
    match state
        .storage
        .read(&params.chunk, params.off, params.max_size)
        .await
    {
        Ok(body) => body.into_response(),
        Err(err) => storage_error(err),
    }
}

pub async fn list_chunks(State(state): State<AppState>) -> Response {
    match state.storage.list_chunks().await {
        Ok(chunks) => Json(chunks).into_response(),
        Err(err) => storage_error(err),
    }
}

pub async fn ack(State(state): State<AppState>, Query(params): Query<AckParams>) -> Response {
    if params.chunk.is_empty() {
        return bad_request("bad `chunk` GET param: chunk name must be provided");
    }
    match state.storage.ack(&params.chunk).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => storage_error(err),
    }
}

fn bad_request(msg: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, msg).into_response()
}

/// Map a storage error onto a status code, keeping the display text as the
/// body so clients get something human-readable.
fn storage_error(err: Error) -> Response {
    let status = match &err {
        Error::ChunkNotFound(_) => StatusCode::NOT_FOUND,
        Error::ChunkActive(_) => StatusCode::CONFLICT,
        Error::Io(_) | Error::NoBoundary => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "storage operation failed");
    }
    (status, err.to_string()).into_response()
}
