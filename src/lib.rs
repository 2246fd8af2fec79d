//! SPA asset server and WebSocket echo relay.
//!
//! Two independently bound listeners share one process: the asset listener
//! serves a single-page application's static files with index fallback and
//! a health probe, the relay listener upgrades connections to a WebSocket
//! channel that echoes every message back verbatim. A fatal error on
//! either listener terminates the process.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod relay;
pub mod resolver;
pub mod server;
