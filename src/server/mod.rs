// Server module
// Listener binding, per-connection serving, and the dual-listener
// supervisor that owns the process lifetime.

mod connection;
mod listener;
mod supervisor;

pub use connection::ListenerRole;
pub use listener::bind_listener;
pub use supervisor::{run, serve_listener};
