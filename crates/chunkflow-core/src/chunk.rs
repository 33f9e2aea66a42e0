use serde::{Deserialize, Serialize};

/// Metadata for one named, append-only segment of the log.
///
/// Exactly one chunk per store is incomplete (still the active write target)
/// at any time. A chunk seals when the store rotates past it; `complete`
/// never flips back to `false`.
///
/// This struct is also the wire shape of the `/listChunks` response, so the
/// field names are part of the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique, sequence-derived identifier (`chunk0`, `chunk1`, ...), stable
    /// for the chunk's lifetime.
    pub name: String,

    /// Whether the chunk is sealed. Sealed chunks receive no further writes
    /// and are eligible for acknowledgment.
    pub complete: bool,
}
