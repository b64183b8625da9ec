//! Application entry point: loads configuration, builds the word graph and
//! serves the game API.

use crossbeam_channel::Receiver;
use sixdegrees::config::AppConfig;
use sixdegrees::engine::GameService;
use sixdegrees::server::{AppContext, create_router};
use sixdegrees::store::{StoreClient, StoreDiagnostic, StoreErrorKind};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("MAIN: Booting Six Degrees...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("MAIN: {}", e);
            std::process::exit(1);
        }
    };

    let game = match GameService::from_config(&config.engine) {
        Ok(game) => game,
        Err(e) => {
            log::error!("MAIN: Failed to build word graph: {}", e);
            std::process::exit(1);
        }
    };

    let (diag_tx, diag_rx) = crossbeam_channel::unbounded();
    let store = match StoreClient::new(&config.store) {
        Ok(store) => store.with_diagnostics(diag_tx),
        Err(e) => {
            log::error!("MAIN: Failed to build store client: {}", e);
            std::process::exit(1);
        }
    };
    if !store.is_enabled() {
        log::warn!("MAIN: No store endpoint configured, results will not be saved");
    }
    start_store_monitor(diag_rx);

    let app = create_router(Arc::new(AppContext { game, store }));

    let addr = config.server.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("MAIN: Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    log::info!("MAIN: Listening on {}. Press Ctrl+C to stop.", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        log::error!("MAIN: Server error: {}", e);
    }

    log::info!("MAIN: Stopped");
}

/// Keeps a per-kind tally of store failures so operators can tell an
/// unreachable store from an empty one.
fn start_store_monitor(rx: Receiver<StoreDiagnostic>) {
    let spawned = thread::Builder::new()
        .name("Store Monitor".to_string())
        .spawn(move || {
            let mut tally: HashMap<StoreErrorKind, u64> = HashMap::new();
            for diag in rx.iter() {
                if diag.kind == StoreErrorKind::Disabled {
                    continue;
                }
                let count = tally.entry(diag.kind).or_default();
                *count += 1;
                log::info!(
                    "STORE: {:?} failures so far: {} (last: {} - {})",
                    diag.kind,
                    count,
                    diag.operation,
                    diag.message
                );
            }
        });
    if let Err(e) = spawned {
        log::warn!("MAIN: Store monitor not started: {}", e);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("MAIN: Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
