// Connection handling module
// Serves one accepted TCP connection with hyper, under the configured
// timeout, dispatching to the asset handler or the relay.

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::Arc;

use crate::config::AppState;
use crate::handler;
use crate::relay::EchoRelay;

/// Which listener a connection arrived on. Decides the service and whether
/// protocol upgrades are honored.
#[derive(Clone)]
pub enum ListenerRole {
    Asset,
    Relay(Arc<EchoRelay>),
}

impl ListenerRole {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Relay(_) => "relay",
        }
    }
}

/// Serve a single connection on its own spawned task.
///
/// The serve future is bounded by the configured read/write timeout; an
/// expired timeout closes the transport and tears the connection down. For
/// the relay, the timeout covers the HTTP exchange up to the upgrade; an
/// upgraded WebSocket session runs on its own task with its own receive
/// timeout.
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    state: Arc<AppState>,
    role: ListenerRole,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let timeout_duration = state.config.connection_timeout();
        let logger = state.logger.clone();
        let role_name = role.name();

        let conn = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(
                io,
                service_fn(move |req| {
                    let state = Arc::clone(&state);
                    let role = role.clone();
                    async move {
                        match role {
                            ListenerRole::Asset => handler::handle_request(req, state).await,
                            ListenerRole::Relay(relay) => relay.handle_request(req).await,
                        }
                    }
                }),
            )
            .with_upgrades();

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => logger.error(&format!("{role_name}: connection error: {e}")),
            Err(_) => logger.error(&format!(
                "{role_name}: connection timed out after {}s",
                timeout_duration.as_secs()
            )),
        }
    });
}
