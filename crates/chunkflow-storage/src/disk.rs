//! Disk-backed chunk store.
//!
//! One regular file per chunk inside the configured directory, named by the
//! chunk identifier. File content is the raw concatenation of
//! marker-terminated messages in write order; there is no index or metadata
//! file. Chunk identity and completeness derive purely from "is this the
//! currently active chunk name".
//!
//! File handles are cached lazily, one per chunk touched in this process
//! lifetime, and dropped when the chunk is acknowledged. All state lives
//! behind a single [`tokio::sync::Mutex`] acquired for the full duration of
//! every operation.

use std::collections::HashMap;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chunkflow_core::{frame, Chunk, Error, Result};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::{Storage, StorageConfig};

/// Durable storage engine over a directory of chunk files.
pub struct DiskStorage {
    inner: Mutex<Inner>,
}

struct Inner {
    directory: PathBuf,
    rotation_threshold: u64,

    /// Every tracked chunk, in creation order.
    chunks: Vec<String>,

    /// Lazily opened file handles, one per chunk touched so far.
    handles: HashMap<String, File>,

    /// The single chunk still accepting writes, if any.
    active: Option<ActiveChunk>,

    /// Sequence for the next chunk name.
    next_index: u64,
}

struct ActiveChunk {
    name: String,
    size: u64,
}

impl DiskStorage {
    /// Open a store over `config.directory`, creating the directory if
    /// needed and probing that it is writable before serving anything.
    ///
    /// Chunk files left by a previous run are rediscovered in index order
    /// and registered as sealed; numbering resumes past the highest index
    /// found. No chunk is active until the first write.
    pub async fn open(config: StorageConfig) -> Result<Self> {
        fs::create_dir_all(&config.directory).await?;
        probe_writable(&config.directory).await?;

        let mut found: Vec<(u64, String)> = Vec::new();
        let mut entries = fs::read_dir(&config.directory).await?;
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                if let Some(idx) = chunk_index(name) {
                    found.push((idx, name.to_string()));
                }
            }
        }
        found.sort_unstable();

        let next_index = found.last().map_or(0, |(idx, _)| idx + 1);
        let chunks: Vec<String> = found.into_iter().map(|(_, name)| name).collect();

        tracing::info!(
            directory = %config.directory.display(),
            existing = chunks.len(),
            "opened disk store"
        );

        Ok(Self {
            inner: Mutex::new(Inner {
                directory: config.directory,
                rotation_threshold: config.rotation_threshold,
                chunks,
                handles: HashMap::new(),
                active: None,
                next_index,
            }),
        })
    }
}

impl Inner {
    /// Get the cached handle for `chunk`, opening (and creating) the file
    /// on first touch.
    async fn file_for(&mut self, chunk: &str) -> Result<&mut File> {
        if !self.handles.contains_key(chunk) {
            let path = self.directory.join(chunk);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .read(true)
                .open(&path)
                .await?;
            self.handles.insert(chunk.to_string(), file);
        }
        self.handles
            .get_mut(chunk)
            .ok_or_else(|| Error::ChunkNotFound(chunk.to_string()))
    }
}

#[async_trait]
impl Storage for DiskStorage {
    async fn write(&self, payload: &[u8]) -> Result<()> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        let name = match inner.active.as_ref() {
            Some(active)
                if active.size + payload.len() as u64 <= inner.rotation_threshold =>
            {
                active.name.clone()
            }
            _ => {
                let name = format!("chunk{}", inner.next_index);
                inner.next_index += 1;
                inner.chunks.push(name.clone());
                inner.active = Some(ActiveChunk {
                    name: name.clone(),
                    size: 0,
                });
                tracing::debug!(chunk = %name, "rotated to new active chunk");
                name
            }
        };

        let file = inner.file_for(&name).await?;
        file.write_all(payload).await?;
        file.flush().await?;

        if let Some(active) = inner.active.as_mut() {
            active.size += payload.len() as u64;
        }
        Ok(())
    }

    async fn list_chunks(&self) -> Result<Vec<Chunk>> {
        let inner = self.inner.lock().await;
        let chunks = inner
            .chunks
            .iter()
            .map(|name| Chunk {
                name: name.clone(),
                complete: inner.active.as_ref().is_none_or(|a| &a.name != name),
            })
            .collect();
        Ok(chunks)
    }

    async fn read(&self, chunk: &str, off: u64, max_size: u64) -> Result<Bytes> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if !inner.chunks.iter().any(|c| c == chunk) {
            return Err(Error::ChunkNotFound(chunk.to_string()));
        }

        let file = inner.file_for(chunk).await?;
        file.seek(SeekFrom::Start(off)).await?;

        let mut buf = vec![0u8; max_size as usize];
        let mut filled = 0;
        while filled < buf.len() {
            let n = file.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            // At or past the end of the chunk: the "drained" signal. A
            // zero-byte read with data still ahead can only mean a zero
            // max_size, which is a too-small buffer.
            if off >= file.metadata().await?.len() {
                return Ok(Bytes::new());
            }
            return Err(Error::NoBoundary);
        }

        // Never hand out the trailing partial message; it is re-read, whole,
        // from the same offset on the next call.
        let (complete, _rest) = frame::split_complete(&buf[..filled])?;
        Ok(Bytes::copy_from_slice(complete))
    }

    async fn ack(&self, chunk: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;

        if inner.active.as_ref().is_some_and(|a| a.name == chunk) {
            return Err(Error::ChunkActive(chunk.to_string()));
        }
        if !inner.chunks.iter().any(|c| c == chunk) {
            return Err(Error::ChunkNotFound(chunk.to_string()));
        }

        // Delete first: a failed remove leaves the chunk tracked and
        // re-readable.
        fs::remove_file(inner.directory.join(chunk)).await?;

        inner.handles.remove(chunk);
        inner.chunks.retain(|c| c != chunk);
        tracing::debug!(chunk, "acknowledged chunk, file removed");
        Ok(())
    }
}

fn chunk_index(name: &str) -> Option<u64> {
    name.strip_prefix("chunk")?.parse().ok()
}

async fn probe_writable(dir: &Path) -> Result<()> {
    let probe = dir.join(".writable-probe");
    fs::write(&probe, b"").await?;
    fs::remove_file(&probe).await?;
    Ok(())
}
