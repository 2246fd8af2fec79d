//! WebSocket echo relay
//!
//! The relay listener serves a plain-text landing page on `/` and upgrades
//! `/flutter` to a WebSocket session that echoes every text or binary
//! message back verbatim, in order, until the peer closes or the first
//! receive/send error.

use crate::http;
use crate::logger::Logger;
use futures_util::{SinkExt, StreamExt};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::tungstenite::handshake::derive_accept_key;
use tokio_tungstenite::tungstenite::protocol::Role;
use tokio_tungstenite::WebSocketStream;

const UPGRADE_PATH: &str = "/flutter";
const HOME_BODY: &str = "WebSocket home";

/// Handshake failure; the connection is abandoned and logged.
#[derive(Debug)]
pub enum UpgradeError {
    NotAnUpgrade,
    UnsupportedVersion,
    MissingKey,
}

impl std::fmt::Display for UpgradeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnUpgrade => write!(f, "not a websocket upgrade request"),
            Self::UnsupportedVersion => write!(f, "unsupported websocket version"),
            Self::MissingKey => write!(f, "websocket key header not provided"),
        }
    }
}

impl std::error::Error for UpgradeError {}

/// Stateless handshake capability, constructed once at startup and passed
/// into the relay rather than living in a process-wide singleton.
#[derive(Debug, Clone, Copy, Default)]
pub struct Upgrader;

impl Upgrader {
    pub const fn new() -> Self {
        Self
    }

    /// Validate the upgrade request and build the `101 Switching Protocols`
    /// response for it.
    pub fn accept_response<T>(
        self,
        req: &Request<T>,
    ) -> Result<Response<Full<Bytes>>, UpgradeError> {
        let headers = req.headers();

        let is_websocket = headers
            .get("upgrade")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("websocket"));
        if *req.method() != Method::GET || !is_websocket {
            return Err(UpgradeError::NotAnUpgrade);
        }

        let version_13 = headers
            .get("sec-websocket-version")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "13");
        if !version_13 {
            return Err(UpgradeError::UnsupportedVersion);
        }

        let key = headers
            .get("sec-websocket-key")
            .ok_or(UpgradeError::MissingKey)?;
        let accept = derive_accept_key(key.as_bytes());

        let resp = Response::builder()
            .status(101)
            .header("Connection", "Upgrade")
            .header("Upgrade", "websocket")
            .header("Sec-WebSocket-Accept", accept)
            .body(Full::new(Bytes::new()))
            .map_err(|_| UpgradeError::NotAnUpgrade)?;
        Ok(resp)
    }
}

/// The relay endpoint: owns the handshake capability, the injected logger,
/// and the per-receive timeout. Shared read-only across connections.
pub struct EchoRelay {
    upgrader: Upgrader,
    logger: Logger,
    read_timeout: Duration,
}

impl EchoRelay {
    pub fn new(upgrader: Upgrader, logger: Logger, read_timeout: Duration) -> Self {
        Self {
            upgrader,
            logger,
            read_timeout,
        }
    }

    /// Entry point for requests on the relay listener.
    pub async fn handle_request(
        &self,
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        self.logger
            .access(&format!("{} {}", req.method(), req.uri().path()));

        let response = match req.uri().path() {
            "/" => http::build_text_response(HOME_BODY),
            UPGRADE_PATH => self.upgrade(req),
            _ => http::build_not_found_response(),
        };
        Ok(response)
    }

    /// Perform the handshake and hand the upgraded transport to its own
    /// echo task. A failed handshake abandons the attempt; the listener is
    /// unaffected.
    fn upgrade(&self, mut req: Request<hyper::body::Incoming>) -> Response<Full<Bytes>> {
        match self.upgrader.accept_response(&req) {
            Ok(response) => {
                let on_upgrade = hyper::upgrade::on(&mut req);
                let logger = self.logger.clone();
                let read_timeout = self.read_timeout;
                tokio::spawn(async move {
                    match on_upgrade.await {
                        Ok(upgraded) => {
                            let ws = WebSocketStream::from_raw_socket(
                                TokioIo::new(upgraded),
                                Role::Server,
                                None,
                            )
                            .await;
                            echo_session(ws, &logger, read_timeout).await;
                        }
                        Err(e) => logger.error(&format!("relay upgrade failed: {e}")),
                    }
                });
                response
            }
            Err(e) => {
                self.logger.error(&format!("relay upgrade rejected: {e}"));
                http::build_bad_request_response(&e.to_string())
            }
        }
    }
}

/// Echo loop for one upgraded connection.
///
/// Strict one-in one-out ordering: each received text or binary message is
/// sent back with the same type and payload before the next receive. Any
/// receive error, send error, or receive timeout ends the session; the
/// transport is released when the stream drops.
async fn echo_session<S>(mut ws: WebSocketStream<S>, logger: &Logger, read_timeout: Duration)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let msg = match tokio::time::timeout(read_timeout, ws.next()).await {
            Err(_) => {
                logger.info("relay: receive timed out, closing connection");
                break;
            }
            Ok(None) => break,
            Ok(Some(Err(e))) => {
                logger.error(&format!("relay read: {e}"));
                break;
            }
            Ok(Some(Ok(m))) => m,
        };

        if msg.is_close() {
            break;
        }
        if msg.is_text() || msg.is_binary() {
            if let Err(e) = ws.send(msg).await {
                logger.error(&format!("relay write: {e}"));
                break;
            }
        }
        // Control frames are answered by the protocol layer.
    }
}
