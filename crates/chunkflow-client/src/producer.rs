//! Producer side of the queue.

use bytes::Bytes;

use crate::check_status;
use crate::error::{ClientError, Result};

/// Appends payloads to a queue server.
///
/// Payloads must arrive pre-framed: one or more messages, each terminated by
/// the end-of-message marker (`b'\n'`), with no marker byte inside any
/// message body. The server stores them verbatim.
pub struct Producer {
    addrs: Vec<String>,
    client: reqwest::Client,
}

impl Producer {
    pub fn new(addrs: Vec<String>) -> Self {
        Self {
            addrs,
            client: reqwest::Client::new(),
        }
    }

    /// Send pre-framed messages to the queue.
    pub async fn send(&self, msgs: Bytes) -> Result<()> {
        let addr = self.addrs.first().ok_or(ClientError::NoAddresses)?;
        let res = self
            .client
            .post(format!("{addr}/write"))
            .body(msgs)
            .send()
            .await?;
        check_status(res).await?;
        Ok(())
    }
}
