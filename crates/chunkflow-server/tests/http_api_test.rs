//! End-to-end tests for the HTTP transport: a real server on an ephemeral
//! port, exercised with a plain HTTP client.

use std::sync::Arc;

use chunkflow_server::{create_router, AppState};
use chunkflow_storage::{MemoryStorage, Storage};

async fn spawn_server(storage: Arc<dyn Storage>) -> String {
    let app = create_router(AppState { storage });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn write_then_read_round_trip() {
    let base = spawn_server(Arc::new(MemoryStorage::new(1024))).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/write"))
        .body("hello\nworld\n")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());

    let res = client
        .get(format!("{base}/read?off=0&maxSize=1024&chunk=chunk0"))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    assert_eq!(res.bytes().await.unwrap(), "hello\nworld\n");
}

#[tokio::test]
async fn read_returns_only_complete_messages() {
    let base = spawn_server(Arc::new(MemoryStorage::new(1024))).await;
    let client = reqwest::Client::new();

    // Trailing fragment without a marker stays on the server.
    client
        .post(format!("{base}/write"))
        .body("12345\n678")
        .send()
        .await
        .unwrap();

    let res = client
        .get(format!("{base}/read?off=0&maxSize=1024&chunk=chunk0"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.bytes().await.unwrap(), "12345\n");
}

#[tokio::test]
async fn drained_chunk_reads_as_empty_ok() {
    let base = spawn_server(Arc::new(MemoryStorage::new(1024))).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/write"))
        .body("abc\n")
        .send()
        .await
        .unwrap();

    let res = client
        .get(format!("{base}/read?off=4&maxSize=1024&chunk=chunk0"))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    assert!(res.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_chunks_reports_wire_shape() {
    let storage = Arc::new(MemoryStorage::new(8));
    let base = spawn_server(storage).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/write"))
        .body("aaaaaa\n")
        .send()
        .await
        .unwrap();
    client
        .post(format!("{base}/write"))
        .body("bbbbbb\n")
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = client
        .get(format!("{base}/listChunks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        serde_json::json!([
            {"name": "chunk0", "complete": true},
            {"name": "chunk1", "complete": false},
        ])
    );
}

#[tokio::test]
async fn ack_statuses() {
    let base = spawn_server(Arc::new(MemoryStorage::new(8))).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/write"))
        .body("aaaaaa\n")
        .send()
        .await
        .unwrap();
    client
        .post(format!("{base}/write"))
        .body("bbbbbb\n")
        .send()
        .await
        .unwrap();

    // Active chunk refuses acknowledgment.
    let res = client
        .get(format!("{base}/ack?chunk=chunk1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CONFLICT);

    // Sealed chunk goes away for good.
    let res = client
        .get(format!("{base}/ack?chunk=chunk0"))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());

    let res = client
        .get(format!("{base}/read?off=0&maxSize=16&chunk=chunk0"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{base}/ack?chunk=chunk0"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_or_empty_params_are_rejected() {
    let base = spawn_server(Arc::new(MemoryStorage::new(1024))).await;
    let client = reqwest::Client::new();

    // Missing query params fail extraction.
    let res = client.get(format!("{base}/read")).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    // An empty chunk name is rejected before touching storage.
    let res = client
        .get(format!("{base}/read?off=0&maxSize=16&chunk="))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    let res = client.get(format!("{base}/ack?chunk=")).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
}
