//! Message framing over the in-band end-of-message marker.
//!
//! Messages are stored back-to-back in a chunk, each terminated by
//! [`MARKER`]. A read at an arbitrary offset with an arbitrary size can end
//! mid-message, so every read is run through [`split_complete`] before any
//! bytes are handed out: the caller gets whole messages only, and the
//! trailing fragment is re-read from the same offset on the next call.
//!
//! Payloads must not contain the marker byte. That is a wire-contract
//! constraint on producers; the framer neither validates nor escapes.

use crate::error::{Error, Result};

/// The in-band end-of-message marker.
pub const MARKER: u8 = b'\n';

/// Split `buf` into the complete messages it contains and the trailing
/// partial fragment.
///
/// Scans from the end for the last occurrence of [`MARKER`]. The first slice
/// returned runs up to and including that marker; the second is everything
/// after it (the start of a message not yet fully read).
///
/// Fails with [`Error::NoBoundary`] if the buffer contains no marker at all.
/// Returning an empty "complete" slice instead would be indistinguishable
/// from an empty buffer, and callers must be able to tell "nothing parseable
/// yet, grow the buffer" apart from "legitimately nothing to read".
pub fn split_complete(buf: &[u8]) -> Result<(&[u8], &[u8])> {
    match buf.iter().rposition(|&b| b == MARKER) {
        Some(idx) => Ok((&buf[..=idx], &buf[idx + 1..])),
        None => Err(Error::NoBoundary),
    }
}
