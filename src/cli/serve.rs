//! Serve command implementation

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use banana_quest::config::Config;
use banana_quest::progression::SystemClock;
use banana_quest::server::{AppState, HttpServer};
use banana_quest::store::GameStore;

/// Open the database and run the HTTP API until the process exits
pub fn serve_command(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let db_path = config.database_path();
    let store = GameStore::with_path(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    info!("[bq:store] Using database {}", db_path.display());

    let purged = store.sessions().purge_expired(chrono::Utc::now())?;
    if purged > 0 {
        info!("[bq:store] Purged {} expired sessions", purged);
    }

    let bind_addr = config.server.bind_addr();
    let state = AppState::new(config, store, Arc::new(SystemClock));
    let server = HttpServer::bind(&bind_addr, state)?;
    server.run();
    Ok(())
}
