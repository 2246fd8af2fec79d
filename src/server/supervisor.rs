//! Dual-listener supervisor
//!
//! Binds the asset and relay listeners up front, runs each accept loop on
//! its own task, and joins the two: the first fatal listener error on
//! either side terminates the whole process. There is no supervised
//! restart; recovery belongs to the external process supervisor.

use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::{handle_connection, ListenerRole};
use super::listener::bind_listener;
use crate::config::AppState;
use crate::relay::{EchoRelay, Upgrader};

/// Bind both listeners and serve until one of them fails.
///
/// Bind failures surface before any serving starts, so no partial-service
/// state can persist. Once serving, both accept loops run for the process
/// lifetime; this function only returns with the error that ended one of
/// them.
pub async fn run(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let spa_addr = state.config.spa_socket_addr()?;
    let relay_addr = state.config.relay_socket_addr()?;

    let spa_listener = bind_listener(spa_addr)
        .map_err(|e| format!("failed to bind asset listener on {spa_addr}: {e}"))?;
    let relay_listener = bind_listener(relay_addr)
        .map_err(|e| format!("failed to bind relay listener on {relay_addr}: {e}"))?;

    let relay = Arc::new(EchoRelay::new(
        Upgrader::new(),
        state.logger.clone(),
        std::time::Duration::from_secs(state.config.performance.read_timeout),
    ));

    let asset_task = tokio::spawn(serve_listener(
        spa_listener,
        Arc::clone(&state),
        ListenerRole::Asset,
    ));
    let relay_task = tokio::spawn(serve_listener(
        relay_listener,
        Arc::clone(&state),
        ListenerRole::Relay(relay),
    ));

    // Neither loop returns Ok; the first to finish carries the fatal error.
    tokio::select! {
        result = asset_task => Err(listener_failure("asset", result)),
        result = relay_task => Err(listener_failure("relay", result)),
    }
}

/// Accept loop for one listener. Every accepted connection is handed to its
/// own task; an accept error is fatal and ends the loop.
pub async fn serve_listener(
    listener: TcpListener,
    state: Arc<AppState>,
    role: ListenerRole,
) -> io::Result<()> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        state
            .logger
            .access(&format!("{}: connection from {peer_addr}", role.name()));
        handle_connection(stream, Arc::clone(&state), role.clone());
    }
}

fn listener_failure(
    name: &str,
    result: Result<io::Result<()>, tokio::task::JoinError>,
) -> Box<dyn std::error::Error> {
    match result {
        Ok(Ok(())) => format!("{name} listener stopped unexpectedly").into(),
        Ok(Err(e)) => format!("{name} listener failed: {e}").into(),
        Err(e) => format!("{name} listener task aborted: {e}").into(),
    }
}
