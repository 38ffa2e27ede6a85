use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use crate::{
    config::Config,
    connection::handle_client_connection,
    expiry::start_expiry_reaper,
    keyspace::KeyValueStore,
    rdb::load_snapshot,
};

mod commands;
mod config;
mod connection;
mod expiry;
mod keyspace;
mod rdb;
mod resp;

/// Main entry point for the server.
///
/// Parses the configuration, seeds the keyspace from the RDB snapshot
/// when one is configured, binds the listener, starts the expiry reaper
/// and then accepts connections, handling each in its own async task.
#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let config = match Config::new(std::env::args()) {
        Ok(config) => config,
        Err(e) => {
            error!("failed to parse command line arguments: {}", e);
            std::process::exit(1);
        }
    };

    let mut store = KeyValueStore::new();

    // Seeding happens before any connection is accepted; a failed load
    // leaves the keyspace empty but does not abort startup.
    if let Some(path) = config.snapshot_path() {
        match load_snapshot(&path, &mut store).await {
            Ok(loaded) => info!(loaded, path = %path.display(), "loaded snapshot"),
            Err(e) => error!(path = %path.display(), "failed to load snapshot: {}", e),
        }
    }

    let listener = match TcpListener::bind(format!("127.0.0.1:{}", config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(port = config.port, "failed to bind TCP listener: {}", e);
            std::process::exit(1);
        }
    };

    info!(port = config.port, "listening for connections");

    let store = Arc::new(store);
    let config = Arc::new(config);

    start_expiry_reaper(Arc::clone(&store));

    loop {
        match listener.accept().await {
            Ok((stream, address)) => {
                let config = Arc::clone(&config);
                let store = Arc::clone(&store);

                tokio::spawn(async move {
                    tracing::debug!(%address, "client connected");
                    handle_client_connection(stream, config, store).await;
                    tracing::debug!(%address, "client disconnected");
                });
            }
            Err(e) => {
                error!("error accepting connection: {}", e);
            }
        }
    }
}
