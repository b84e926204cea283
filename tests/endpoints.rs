//! End-to-end tests for the three endpoints over a real socket.

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH};
use reqwest::StatusCode;
use speedtest_server::config::ServerConfig;

mod common;

#[tokio::test]
async fn test_download_is_ten_mebibytes_of_zeros() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::http_client();

    let res = client.get(server.url("/testfile.bin")).send().await.expect("Server unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_LENGTH], "10485760");
    assert_eq!(
        res.headers()[CONTENT_DISPOSITION],
        "attachment; filename=testfile.bin"
    );

    let body = res.bytes().await.unwrap();
    assert_eq!(body.len(), 10_485_760);
    assert!(body.iter().all(|&b| b == 0), "Payload must be zero-filled");

    server.stop().await;
}

#[tokio::test]
async fn test_ping_head() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::http_client();

    let res = client.head(server.url("/ping")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.bytes().await.unwrap().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn test_upload_any_body() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::http_client();

    let bodies: Vec<Vec<u8>> = vec![
        Vec::new(),
        b"hello".to_vec(),
        (0..=255u8).cycle().take(3 * 1024 * 1024).collect(),
    ];

    for body in bodies {
        let len = body.len();
        let res = client.post(server.url("/upload")).body(body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "Upload of {} bytes failed", len);
        assert_eq!(res.text().await.unwrap(), "Upload complete");
    }

    server.stop().await;
}

#[tokio::test]
async fn test_upload_limit() {
    let mut config = ServerConfig::default();
    config.payload.max_upload_bytes = Some(1024);
    let server = common::start_server(config).await;
    let client = common::http_client();

    let ok = client.post(server.url("/upload")).body(vec![0u8; 1024]).send().await.unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let rejected = client.post(server.url("/upload")).body(vec![0u8; 4096]).send().await.unwrap();
    assert_eq!(rejected.status(), StatusCode::PAYLOAD_TOO_LARGE);

    server.stop().await;
}

#[tokio::test]
async fn test_framework_defaults() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::http_client();

    let missing = client.get(server.url("/missing")).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let wrong_method = client.get(server.url("/ping")).send().await.unwrap();
    assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);

    let wrong_method = client.get(server.url("/upload")).send().await.unwrap();
    assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);

    server.stop().await;
}

#[tokio::test]
async fn test_graceful_stop() {
    let server = common::start_server(ServerConfig::default()).await;
    let addr = server.addr;
    server.stop().await;

    let client = common::http_client();
    let res = client.head(format!("http://{}/ping", addr)).send().await;
    assert!(res.is_err(), "Server should refuse connections after shutdown");
}
