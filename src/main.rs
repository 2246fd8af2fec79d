use std::process::ExitCode;
use std::sync::Arc;

use spa_relay::config::{AppState, Config};
use spa_relay::logger::{self, Logger};
use spa_relay::server;

fn main() -> ExitCode {
    // Configuration problems are fatal before any listener binds.
    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            Logger::console().fatal(&format!("failed to load configuration: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let log = match Logger::from_config(&cfg.logging) {
        Ok(log) => log,
        Err(e) => {
            Logger::console().fatal(&format!("failed to initialize logger: {e}"));
            return ExitCode::FAILURE;
        }
    };

    logger::log_server_start(&log, &cfg);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            log.fatal(&format!("failed to build runtime: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(cfg, log.clone());
    // The supervisor only returns when a listener has failed.
    if let Err(e) = runtime.block_on(server::run(Arc::clone(&state))) {
        log.fatal(&e.to_string());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
