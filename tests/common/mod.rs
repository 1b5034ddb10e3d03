//! Shared utilities for integration testing.

use axum::{extract::Request, response::IntoResponse, routing::any, Router};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start an origin that answers every connection with the given raw HTTP
/// response. Returns the address it listens on.
pub async fn start_raw_origin(raw: String) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let raw = raw.clone();
                    tokio::spawn(async move {
                        // Drain the request head before answering.
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket.write_all(raw.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start an origin that returns a fixed 200 response with the given body.
pub async fn start_mock_origin(body: &str) -> SocketAddr {
    start_raw_origin(format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    ))
    .await
}

/// Start an axum origin that echoes "method|content-type|body" back.
#[allow(dead_code)]
pub async fn start_echo_origin() -> SocketAddr {
    async fn echo(request: Request) -> impl IntoResponse {
        let method = request.method().to_string();
        let content_type = request
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        let body = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        format!(
            "{}|{}|{}",
            method,
            content_type,
            String::from_utf8_lossy(&body)
        )
    }

    let app = Router::new()
        .route("/", any(echo))
        .route("/{*path}", any(echo));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}
