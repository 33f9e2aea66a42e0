//! Storage configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the disk engine.
///
/// ```ignore
/// use chunkflow_storage::StorageConfig;
///
/// let config = StorageConfig {
///     directory: "/var/lib/chunkflow".into(),
///     ..Default::default()
/// };
///
/// // Small threshold for fast rotation in tests
/// let config = StorageConfig {
///     directory: tmp.path().into(),
///     rotation_threshold: 1024,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one regular file per chunk. Created on open if it
    /// does not exist.
    pub directory: PathBuf,

    /// Rotate the active chunk once a write would push it past this many
    /// bytes (default: 20 MiB).
    #[serde(default = "default_rotation_threshold")]
    pub rotation_threshold: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./data"),
            rotation_threshold: default_rotation_threshold(),
        }
    }
}

pub(crate) fn default_rotation_threshold() -> u64 {
    20 * 1024 * 1024 // 20 MiB
}
