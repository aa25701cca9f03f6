//! Testdeck Web Server - Main Entry Point

use std::sync::Arc;
use tracing::info;

use testdeck_common::db::SqliteNoteStore;
use testdeck_common::notes::{MemoryNoteStore, NoteStore};
use testdeck_web::{build_router, AppState, WebConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cfg = WebConfig::from_env();

    let notes: Arc<dyn NoteStore> = match &cfg.notes_db {
        Some(path) => Arc::new(SqliteNoteStore::open(path)?),
        None => Arc::new(MemoryNoteStore::new()),
    };

    let addr = cfg.listen_addr();
    info!(
        "Testdeck harness v{} serving scenarios from {}",
        testdeck_common::VERSION,
        cfg.scenarios_path.display()
    );

    let state = Arc::new(AppState::new(cfg, notes));
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
