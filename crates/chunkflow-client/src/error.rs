//! Error types for client operations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No data currently available. This is a normal, expected condition,
    /// not a fault: the caller owns the retry cadence and simply polls
    /// again later.
    #[error("end of stream")]
    EndOfStream,

    /// The HTTP request itself failed (connect, protocol, body decode).
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-OK status.
    #[error("server returned http code {status}: {body}")]
    Server { status: u16, body: String },

    /// The client was constructed with an empty address list.
    #[error("no server addresses configured")]
    NoAddresses,
}
