//! Shared fixtures: an app state over a temp asset directory and helpers
//! to spawn the two listeners on ephemeral ports.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use spa_relay::config::{AppState, Config, LoggingConfig, PerformanceConfig, ServerConfig};
use spa_relay::logger::Logger;
use spa_relay::relay::{EchoRelay, Upgrader};
use spa_relay::server::{bind_listener, serve_listener, ListenerRole};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub fn test_state(static_dir: &Path) -> Arc<AppState> {
    let config = Config {
        server: ServerConfig {
            static_dir: static_dir.to_str().unwrap().to_string(),
            index_file: "index.html".to_string(),
            spa_addr: "127.0.0.1:0".to_string(),
            relay_addr: "127.0.0.1:0".to_string(),
        },
        performance: PerformanceConfig {
            read_timeout: 15,
            write_timeout: 15,
        },
        logging: LoggingConfig {
            access_log: false,
            log_file: None,
        },
    };
    AppState::new(config, Logger::console())
}

/// Spawn the asset listener on an ephemeral port.
pub fn spawn_asset_listener(state: &Arc<AppState>) -> SocketAddr {
    let listener = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_listener(
        listener,
        Arc::clone(state),
        ListenerRole::Asset,
    ));
    addr
}

/// Spawn the relay listener on an ephemeral port.
pub fn spawn_relay_listener(state: &Arc<AppState>) -> SocketAddr {
    let listener = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();
    let relay = Arc::new(EchoRelay::new(
        Upgrader::new(),
        state.logger.clone(),
        Duration::from_secs(15),
    ));
    tokio::spawn(serve_listener(
        listener,
        Arc::clone(state),
        ListenerRole::Relay(relay),
    ));
    addr
}

/// One-shot HTTP/1.1 GET over a raw TCP stream; returns (status, body).
pub async fn http_get(addr: SocketAddr, path: &str, extra_headers: &str) -> (u16, Vec<u8>) {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let request =
        format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n{extra_headers}Connection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();

    let header_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no header terminator");
    let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
    let status: u16 = head
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
        .expect("no status line");
    (status, raw[header_end + 4..].to_vec())
}
