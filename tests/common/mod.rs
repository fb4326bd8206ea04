use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use warda::api::WardaClient;
use warda::config::ApiConfig;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Client pointing at the given mock server with short timeouts
#[allow(dead_code)]
pub fn client_for(base_url: &str) -> WardaClient {
    client_with_timeout(base_url, 5)
}

/// Client whose whole-request timeout is `request_timeout_seconds`
#[allow(dead_code)]
pub fn client_with_timeout(base_url: &str, request_timeout_seconds: u64) -> WardaClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        connect_timeout_seconds: 5,
        request_timeout_seconds,
    };
    WardaClient::new(&config).expect("client should build")
}

/// Serves one response that announces a 500 byte body, sends a fragment of
/// it and closes the connection. Returns the base URL.
#[allow(dead_code)]
pub async fn cut_off_body_server(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind listener");
    let addr = listener.local_addr().expect("listener has no address");

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let head = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: 500\r\n\r\n{{\"detail\":",
                status_line
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", addr)
}

/// One `/chat/history` entry as the backend serializes it
#[allow(dead_code)]
pub fn history_entry(id: i64, timestamp: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "user_id": 42,
        "query": format!("question {}", id),
        "response": format!("answer {}", id),
        "emotional_state": "neutral",
        "timestamp": timestamp
    })
}
