//! Contract tests shared by both storage engines.
//!
//! The disk and in-memory engines must be indistinguishable through the
//! `Storage` trait, so every property here runs once against each. Engine
//! wrappers live at the bottom; the checks themselves only see
//! `&dyn Storage`.

use chunkflow_storage::{DiskStorage, Error, MemoryStorage, Storage, StorageConfig};
use tempfile::TempDir;

const THRESHOLD: u64 = 16;

/// Read a chunk from the front until the drained signal, concatenating the
/// framed output, the way a consumer would.
async fn drain(storage: &dyn Storage, chunk: &str, max_size: u64) -> Vec<u8> {
    let mut out = Vec::new();
    let mut off = 0u64;
    loop {
        let body = storage.read(chunk, off, max_size).await.unwrap();
        if body.is_empty() {
            return out;
        }
        off += body.len() as u64;
        out.extend_from_slice(&body);
    }
}

async fn check_rotation_preserves_every_byte(storage: &dyn Storage) {
    // 7-byte messages against a 16-byte threshold: two messages per chunk.
    let messages: Vec<String> = (0..6).map(|i| format!("msg-{i:02}\n")).collect();
    for msg in &messages {
        storage.write(msg.as_bytes()).await.unwrap();
    }

    let chunks = storage.list_chunks().await.unwrap();
    assert_eq!(chunks.len(), 3);
    assert_eq!(
        chunks.iter().filter(|c| !c.complete).count(),
        1,
        "exactly one chunk may be incomplete"
    );
    assert!(
        !chunks.last().unwrap().complete,
        "the newest chunk is the active one"
    );
    assert_eq!(
        chunks.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["chunk0", "chunk1", "chunk2"],
        "creation order, sequence-derived names"
    );

    // Nothing lost, nothing duplicated, nothing reordered across rotation.
    let mut stored = Vec::new();
    for chunk in &chunks {
        stored.extend(drain(storage, &chunk.name, 1024).await);
    }
    assert_eq!(stored, messages.concat().into_bytes());
}

async fn check_read_never_splits_a_message(storage: &dyn Storage) {
    storage.write(b"12345\n").await.unwrap();
    storage.write(b"678\n").await.unwrap();

    // A buffer that cannot hold the first message is a retryable failure,
    // not a truncated result, and must not advance anything.
    assert!(matches!(
        storage.read("chunk0", 0, 4).await,
        Err(Error::NoBoundary)
    ));

    // 7 bytes covers "12345\n6": only the complete message comes back.
    let body = storage.read("chunk0", 0, 7).await.unwrap();
    assert_eq!(&body[..], b"12345\n");

    // The partial tail is re-read whole from the same offset.
    let body = storage.read("chunk0", 6, 1024).await.unwrap();
    assert_eq!(&body[..], b"678\n");
}

async fn check_drained_signal(storage: &dyn Storage) {
    storage.write(b"abc\n").await.unwrap();

    let body = storage.read("chunk0", 4, 1024).await.unwrap();
    assert!(body.is_empty(), "offset at end of chunk reads as empty, no error");

    let body = storage.read("chunk0", 400, 1024).await.unwrap();
    assert!(body.is_empty(), "offset past end of chunk reads the same way");
}

async fn check_idempotent_reread(storage: &dyn Storage) {
    storage.write(b"one\n").await.unwrap();
    storage.write(b"two\n").await.unwrap();

    let first = storage.read("chunk0", 0, 6).await.unwrap();
    let second = storage.read("chunk0", 0, 6).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(&first[..], b"one\n");
}

async fn check_ack_is_destructive_and_exclusive(storage: &dyn Storage) {
    storage.write(b"aaaaaaaaaaaaaa\n").await.unwrap(); // chunk0, 15 bytes
    storage.write(b"bbbbbbbbbbbbbb\n").await.unwrap(); // rotates; chunk1 active

    assert!(matches!(
        storage.ack("chunk1").await,
        Err(Error::ChunkActive(_))
    ));
    assert!(matches!(
        storage.ack("no-such-chunk").await,
        Err(Error::ChunkNotFound(_))
    ));

    storage.ack("chunk0").await.unwrap();

    let names: Vec<String> = storage
        .list_chunks()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["chunk1"]);

    assert!(matches!(
        storage.read("chunk0", 0, 1024).await,
        Err(Error::ChunkNotFound(_))
    ));
    assert!(matches!(
        storage.ack("chunk0").await,
        Err(Error::ChunkNotFound(_))
    ));
}

async fn check_read_of_unknown_chunk(storage: &dyn Storage) {
    assert!(matches!(
        storage.read("chunk0", 0, 1024).await,
        Err(Error::ChunkNotFound(_))
    ));
}

async fn check_empty_store_lists_nothing(storage: &dyn Storage) {
    assert!(storage.list_chunks().await.unwrap().is_empty());
}

async fn disk(dir: &TempDir) -> DiskStorage {
    DiskStorage::open(StorageConfig {
        directory: dir.path().to_path_buf(),
        rotation_threshold: THRESHOLD,
    })
    .await
    .unwrap()
}

fn memory() -> MemoryStorage {
    MemoryStorage::new(THRESHOLD)
}

macro_rules! contract_test {
    ($name:ident, $check:ident) => {
        mod $name {
            use super::*;

            #[tokio::test]
            async fn disk_engine() {
                let dir = TempDir::new().unwrap();
                let storage = disk(&dir).await;
                $check(&storage).await;
            }

            #[tokio::test]
            async fn memory_engine() {
                let storage = memory();
                $check(&storage).await;
            }
        }
    };
}

contract_test!(rotation_preserves_every_byte, check_rotation_preserves_every_byte);
contract_test!(read_never_splits_a_message, check_read_never_splits_a_message);
contract_test!(drained_signal, check_drained_signal);
contract_test!(idempotent_reread, check_idempotent_reread);
contract_test!(ack_is_destructive_and_exclusive, check_ack_is_destructive_and_exclusive);
contract_test!(read_of_unknown_chunk, check_read_of_unknown_chunk);
contract_test!(empty_store_lists_nothing, check_empty_store_lists_nothing);
