//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use remote_config_middleware::{ClientConfig, RemoteConfigClient};

pub const APP_ID: &str = "test-app";

/// Path the client requests for `namespace` with the test app id.
pub fn namespace_path(namespace: &str) -> String {
    format!("/configfiles/json/{}/default/{}", APP_ID, namespace)
}

/// Start a programmable config server on an ephemeral port.
///
/// `f` receives the request path and returns `(status, body)`; it may sleep
/// to simulate a slow server.
pub async fn start_config_server<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut reader = BufReader::new(socket);

                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.is_err() {
                            return;
                        }
                        // Drain headers so closing the socket doesn't reset it.
                        loop {
                            let mut line = String::new();
                            match reader.read_line(&mut line).await {
                                Ok(0) | Err(_) => break,
                                Ok(_) if line == "\r\n" => break,
                                Ok(_) => {}
                            }
                        }

                        let path = request_line
                            .split_whitespace()
                            .nth(1)
                            .unwrap_or("/")
                            .to_string();
                        let (status, body) = f(path).await;

                        let reason = match status {
                            200 => "OK",
                            204 => "No Content",
                            403 => "Forbidden",
                            404 => "Not Found",
                            429 => "Too Many Requests",
                            500 => "Internal Server Error",
                            503 => "Service Unavailable",
                            _ => "Unknown",
                        };
                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );

                        let mut socket = reader.into_inner();
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Client config pointed at a test server.
pub fn client_config(addr: SocketAddr) -> ClientConfig {
    let mut config = ClientConfig::new(APP_ID);
    config.config_server_url = format!("http://{}", addr);
    config.refresh_interval_secs = 1;
    config.request_timeout_secs = 6;
    config.use_system_proxy = false;
    config
}

pub fn client(addr: SocketAddr) -> RemoteConfigClient {
    RemoteConfigClient::new(client_config(addr)).unwrap()
}

pub fn namespaces(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
