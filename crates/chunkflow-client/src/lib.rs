//! chunkflow client library.
//!
//! Two halves, matching the two ends of the queue:
//!
//! - [`Producer`]: appends pre-framed payloads with `POST /write`
//! - [`Consumer`]: the offset-tracking pull protocol — discovers chunks,
//!   drains sealed ones first, acknowledges what it has fully consumed,
//!   and follows the active chunk as data arrives
//!
//! Delivery is at-least-once: a consumer that crashes between reading and
//! acknowledging will see the same bytes again, so message handling should
//! be idempotent.

pub mod consumer;
pub mod error;
pub mod producer;

pub use consumer::{
    AddressPicker, Consumer, ConsumerBuilder, RandomPicker, DEFAULT_SCRATCH_SIZE,
};
pub use error::{ClientError, Result};
pub use producer::Producer;

/// Pass through an OK response, turn anything else into
/// [`ClientError::Server`] carrying the status and the error body.
pub(crate) async fn check_status(res: reqwest::Response) -> Result<reqwest::Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(ClientError::Server {
        status: status.as_u16(),
        body,
    })
}
