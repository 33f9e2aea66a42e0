//! chunkflow HTTP transport.
//!
//! A thin axum layer mapping four routes onto the storage contract:
//!
//! - `POST /write` — body is the raw payload; empty 200 on success
//! - `GET /read?off=&maxSize=&chunk=` — zero or more complete,
//!   marker-terminated messages
//! - `GET /listChunks` — JSON array of `{"name", "complete"}`
//! - `GET /ack?chunk=` — empty 200 on success
//!
//! Failures come back as a non-OK status with the error's display text as
//! the body. An empty 200 body from `/read` is not an error: it is the
//! drained signal the consumer protocol is built on.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use chunkflow_storage::Storage;

pub mod handlers;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

/// Build the router with all four endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/write", post(handlers::write))
        .route("/read", get(handlers::read))
        .route("/listChunks", get(handlers::list_chunks))
        .route("/ack", get(handlers::ack))
        .with_state(state)
}
