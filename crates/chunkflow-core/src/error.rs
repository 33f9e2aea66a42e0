//! Error types shared by the storage engines.
//!
//! Every storage operation returns [`Result<T>`], aliased to
//! `Result<T, Error>`, so call sites propagate with `?`. The store never
//! retries internally; each failure is surfaced to the caller with enough
//! context (chunk name, underlying cause) to decide what to do next.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Disk I/O failed. Surfaced as-is, never silently retried.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The referenced chunk does not exist or was already acknowledged.
    #[error("chunk {0:?} does not exist")]
    ChunkNotFound(String),

    /// Attempted to acknowledge the chunk currently being written into.
    #[error("chunk {0:?} is currently being written into and can't be acknowledged")]
    ChunkActive(String),

    /// The supplied buffer contains no message boundary. The caller should
    /// retry with a larger read buffer rather than advance its offset.
    #[error("no message boundary found in buffer")]
    NoBoundary,
}
