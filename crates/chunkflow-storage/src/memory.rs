//! In-memory chunk store.
//!
//! The same rotation, framing, and acknowledgment semantics as
//! [`DiskStorage`](crate::DiskStorage), over plain in-process buffers.
//! Consumers cannot tell the two apart through the [`Storage`] trait; the
//! shared contract suite asserts exactly that. Nothing survives a restart.

use async_trait::async_trait;
use bytes::Bytes;
use chunkflow_core::{frame, Chunk, Error, Result};
use tokio::sync::Mutex;

use crate::{config, Storage};

/// Volatile storage engine, primarily for development and tests.
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

struct Inner {
    rotation_threshold: u64,
    /// Every tracked chunk, in creation order.
    chunks: Vec<MemChunk>,
    /// Name of the single chunk still accepting writes, if any.
    active: Option<String>,
    next_index: u64,
}

struct MemChunk {
    name: String,
    data: Vec<u8>,
}

impl MemoryStorage {
    pub fn new(rotation_threshold: u64) -> Self {
        Self {
            inner: Mutex::new(Inner {
                rotation_threshold,
                chunks: Vec::new(),
                active: None,
                next_index: 0,
            }),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(config::default_rotation_threshold())
    }
}

impl Inner {
    fn size_of(&self, name: &str) -> u64 {
        self.chunks
            .iter()
            .find(|c| c.name == name)
            .map_or(0, |c| c.data.len() as u64)
    }

    fn rotate(&mut self) -> String {
        let name = format!("chunk{}", self.next_index);
        self.next_index += 1;
        self.chunks.push(MemChunk {
            name: name.clone(),
            data: Vec::new(),
        });
        self.active = Some(name.clone());
        name
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn write(&self, payload: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock().await;

        let name = match inner.active.as_deref() {
            Some(name)
                if inner.size_of(name) + payload.len() as u64 <= inner.rotation_threshold =>
            {
                name.to_string()
            }
            _ => inner.rotate(),
        };

        let Some(chunk) = inner.chunks.iter_mut().find(|c| c.name == name) else {
            return Err(Error::ChunkNotFound(name));
        };
        chunk.data.extend_from_slice(payload);
        Ok(())
    }

    async fn list_chunks(&self) -> Result<Vec<Chunk>> {
        let inner = self.inner.lock().await;
        let chunks = inner
            .chunks
            .iter()
            .map(|c| Chunk {
                name: c.name.clone(),
                complete: inner.active.as_deref() != Some(c.name.as_str()),
            })
            .collect();
        Ok(chunks)
    }

    async fn read(&self, chunk: &str, off: u64, max_size: u64) -> Result<Bytes> {
        let inner = self.inner.lock().await;

        let Some(entry) = inner.chunks.iter().find(|c| c.name == chunk) else {
            return Err(Error::ChunkNotFound(chunk.to_string()));
        };

        let len = entry.data.len() as u64;
        if off >= len {
            return Ok(Bytes::new());
        }

        let end = len.min(off.saturating_add(max_size)) as usize;
        let (complete, _rest) = frame::split_complete(&entry.data[off as usize..end])?;
        Ok(Bytes::copy_from_slice(complete))
    }

    async fn ack(&self, chunk: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;

        if inner.active.as_deref() == Some(chunk) {
            return Err(Error::ChunkActive(chunk.to_string()));
        }
        if !inner.chunks.iter().any(|c| c.name == chunk) {
            return Err(Error::ChunkNotFound(chunk.to_string()));
        }

        inner.chunks.retain(|c| c.name != chunk);
        Ok(())
    }
}
