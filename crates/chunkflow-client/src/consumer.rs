//! Consumer side of the queue: the offset-tracking pull protocol.
//!
//! A consumer holds at most one "current chunk" and a byte offset into it.
//! Each [`Consumer::receive`] call walks the protocol state machine:
//!
//! 1. With no chunk selected, list chunks on one server and select one,
//!    preferring sealed chunks. Acknowledgment can only reclaim sealed
//!    chunks, so a consumer that always raced to the active chunk would
//!    starve reclamation of older data indefinitely.
//! 2. Read the current chunk at the tracked offset.
//! 3. Bytes returned: advance the offset and hand them to the caller.
//! 4. Nothing returned: a still-active chunk means "caught up for now"
//!    (`EndOfStream`); a sealed chunk is fully drained, so acknowledge it
//!    and go back to step 1 within the same call.
//!
//! The offset only ever advances by the byte count the server actually
//! returned, and the server only returns whole messages, so a consumer can
//! neither skip nor split a message across chunk boundaries.

use bytes::Bytes;
use chunkflow_core::Chunk;
use rand::Rng;

use crate::check_status;
use crate::error::{ClientError, Result};

/// Read-buffer size `receive` asks the server for by default.
pub const DEFAULT_SCRATCH_SIZE: u64 = 64 * 1024;

/// Strategy for choosing which configured server to poll.
///
/// Injectable so tests can force a deterministic choice; production uses
/// [`RandomPicker`].
pub trait AddressPicker: Send + Sync {
    /// Return an index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Uniform random choice. Spreads read load across servers with no
/// coordination between consumers.
#[derive(Debug, Default)]
pub struct RandomPicker;

impl AddressPicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// A client instance connected to a set of queue servers.
///
/// Sequential per instance: one in-flight request at a time, no internal
/// concurrency.
///
/// ```ignore
/// use chunkflow_client::{ClientError, Consumer};
///
/// let mut consumer = Consumer::new(vec!["http://localhost:8080".to_string()]);
/// loop {
///     match consumer.receive().await {
///         Ok(msgs) => handle(msgs),
///         Err(ClientError::EndOfStream) => sleep_briefly().await,
///         Err(e) => return Err(e.into()),
///     }
/// }
/// ```
pub struct Consumer {
    addrs: Vec<String>,
    client: reqwest::Client,
    picker: Box<dyn AddressPicker>,
    scratch_size: u64,

    /// The chunk currently being read, if any. The offset is meaningful
    /// only relative to this chunk and resets whenever it changes.
    current_chunk: Option<Chunk>,
    offset: u64,
}

/// Builder for [`Consumer`].
pub struct ConsumerBuilder {
    addrs: Vec<String>,
    picker: Box<dyn AddressPicker>,
    scratch_size: u64,
}

impl ConsumerBuilder {
    pub fn new(addrs: Vec<String>) -> Self {
        Self {
            addrs,
            picker: Box::new(RandomPicker),
            scratch_size: DEFAULT_SCRATCH_SIZE,
        }
    }

    /// Replace the server-selection strategy.
    pub fn picker(mut self, picker: Box<dyn AddressPicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Set the read-buffer size requested per read. Reads fail with a
    /// too-small-buffer error when no single message fits; larger messages
    /// need a larger scratch size.
    pub fn scratch_size(mut self, scratch_size: u64) -> Self {
        self.scratch_size = scratch_size;
        self
    }

    pub fn build(self) -> Consumer {
        Consumer {
            addrs: self.addrs,
            client: reqwest::Client::new(),
            picker: self.picker,
            scratch_size: self.scratch_size,
            current_chunk: None,
            offset: 0,
        }
    }
}

impl Consumer {
    /// A consumer with default settings (random server choice, 64 KiB
    /// scratch buffer).
    pub fn new(addrs: Vec<String>) -> Self {
        Self::builder(addrs).build()
    }

    pub fn builder(addrs: Vec<String>) -> ConsumerBuilder {
        ConsumerBuilder::new(addrs)
    }

    /// Wait for the next batch of complete messages.
    ///
    /// Returns [`ClientError::EndOfStream`] when nothing is currently
    /// available anywhere; that is the signal to poll again later, not a
    /// failure. Acknowledges (and thereby deletes) each sealed chunk as
    /// soon as it has been fully drained.
    pub async fn receive(&mut self) -> Result<Bytes> {
        loop {
            let addr = self.pick_addr()?.to_string();

            let chunk = match &self.current_chunk {
                Some(chunk) => chunk.clone(),
                None => {
                    let chunk = self.select_chunk(&addr).await?;
                    self.offset = 0;
                    self.current_chunk = Some(chunk.clone());
                    chunk
                }
            };

            let body = self.read_at(&addr, &chunk.name).await?;
            if !body.is_empty() {
                self.offset += body.len() as u64;
                return Ok(body);
            }

            // Zero bytes with an OK status: everything written to this
            // chunk so far has been drained.
            if !chunk.complete {
                // Still the active chunk; more data may land soon.
                return Err(ClientError::EndOfStream);
            }

            // Sealed and fully drained: reclaim it, then try to serve the
            // caller from the next chunk instead of returning empty.
            tracing::debug!(chunk = %chunk.name, "chunk drained, acknowledging");
            self.ack(&addr, &chunk.name).await?;
            self.current_chunk = None;
            self.offset = 0;
        }
    }

    fn pick_addr(&self) -> Result<&str> {
        if self.addrs.is_empty() {
            return Err(ClientError::NoAddresses);
        }
        let idx = self.picker.pick(self.addrs.len());
        Ok(&self.addrs[idx])
    }

    /// Choose the next chunk to read from `addr`, preferring sealed chunks
    /// so they get drained and freed.
    async fn select_chunk(&self, addr: &str) -> Result<Chunk> {
        let chunks = self.list_chunks(addr).await?;
        if chunks.is_empty() {
            return Err(ClientError::EndOfStream);
        }
        let chunk = chunks
            .iter()
            .find(|c| c.complete)
            .unwrap_or(&chunks[0])
            .clone();
        Ok(chunk)
    }

    async fn list_chunks(&self, addr: &str) -> Result<Vec<Chunk>> {
        let res = self.client.get(format!("{addr}/listChunks")).send().await?;
        let res = check_status(res).await?;
        Ok(res.json().await?)
    }

    async fn read_at(&self, addr: &str, chunk: &str) -> Result<Bytes> {
        let url = format!(
            "{addr}/read?off={}&maxSize={}&chunk={chunk}",
            self.offset, self.scratch_size
        );
        let res = self.client.get(url).send().await?;
        let res = check_status(res).await?;
        Ok(res.bytes().await?)
    }

    async fn ack(&self, addr: &str, chunk: &str) -> Result<()> {
        let res = self
            .client
            .get(format!("{addr}/ack?chunk={chunk}"))
            .send()
            .await?;
        check_status(res).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_picker_stays_in_bounds() {
        let picker = RandomPicker;
        for len in [1usize, 2, 7] {
            for _ in 0..100 {
                assert!(picker.pick(len) < len);
            }
        }
    }
}
