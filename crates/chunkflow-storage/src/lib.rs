//! chunkflow storage engines.
//!
//! A store owns an ordered collection of chunks: append-only segments of the
//! log, exactly one of which is "active" (still receiving writes) at any
//! time. Producers append pre-framed payloads; the store rotates the active
//! chunk by size; consumers read by `(chunk, offset, max_size)` and
//! acknowledge sealed chunks to reclaim space.
//!
//! Two engines implement the same [`Storage`] contract:
//!
//! - [`DiskStorage`]: one regular file per chunk inside a configured
//!   directory. This is the durable engine.
//! - [`MemoryStorage`]: the same semantics over in-process buffers, for
//!   development and tests.
//!
//! Their externally observable behavior is identical; the shared contract
//! test suite in `tests/storage_contract.rs` runs against both.
//!
//! ## Concurrency
//!
//! Every operation on a store runs under one store-wide exclusive lock held
//! for the operation's full duration. That serializes all I/O through the
//! store: no caller can observe a half-rotated chunk or a file mid-deletion,
//! and an acknowledgment can never race a read of the same chunk. The lock
//! is the whole consistency story, traded against throughput on purpose for
//! a single-node queue.

pub mod config;
pub mod disk;
pub mod memory;

use async_trait::async_trait;
use bytes::Bytes;

pub use chunkflow_core::{Chunk, Error, Result};
pub use config::StorageConfig;
pub use disk::DiskStorage;
pub use memory::MemoryStorage;

/// The contract every storage engine satisfies and the transport binds to.
///
/// Handlers hold the store as `Arc<dyn Storage>`, so the disk and in-memory
/// engines are interchangeable behind this seam.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Append `payload` to the active chunk, rotating first if the chunk
    /// would grow past the rotation threshold (or if no chunk is active
    /// yet). The payload is stored verbatim: producers send it already
    /// marker-terminated, and the store does not inspect it.
    async fn write(&self, payload: &[u8]) -> Result<()>;

    /// Every chunk currently tracked by the store, in creation order, each
    /// with its `complete` flag.
    async fn list_chunks(&self) -> Result<Vec<Chunk>>;

    /// Read up to `max_size` bytes from `chunk` starting at `off`, returning
    /// only whole messages.
    ///
    /// `Ok` with an empty buffer means the offset is at or past the current
    /// end of the chunk: the caller has drained everything written so far.
    /// Callers tell "drained and sealed" apart from "drained but still
    /// active" with the chunk's `complete` flag.
    ///
    /// The bytes read are cut at the last message boundary; the trailing
    /// fragment stays unread and will be returned, whole, by a later read at
    /// the same offset. Fails with [`Error::NoBoundary`] when `max_size` is
    /// too small to span even one message, and with
    /// [`Error::ChunkNotFound`] when the chunk was never created or was
    /// already acknowledged.
    async fn read(&self, chunk: &str, off: u64, max_size: u64) -> Result<Bytes>;

    /// Delete `chunk` and everything in it. Irreversible.
    ///
    /// Fails with [`Error::ChunkActive`] if `chunk` is still the active
    /// write target, and [`Error::ChunkNotFound`] if it is unknown. The
    /// caller is solely responsible for having drained the chunk first.
    async fn ack(&self, chunk: &str) -> Result<()>;
}
