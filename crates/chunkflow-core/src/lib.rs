//! Shared types for the chunkflow message queue.
//!
//! This crate holds the pieces every other chunkflow crate agrees on:
//!
//! - [`Chunk`]: the metadata describing one named segment of the log
//! - [`frame`]: splitting raw byte buffers on message boundaries
//! - [`Error`]: the storage-level error taxonomy

pub mod chunk;
pub mod error;
pub mod frame;

pub use chunk::Chunk;
pub use error::{Error, Result};
