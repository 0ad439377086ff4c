//! Binary entry point.

use mirage_core::{tracing_setup, MirageConfig};
use mirage_server::{router, AppState};
use mirage_storage::AnalysisStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_setup::init_tracing();

    let cwd = std::env::current_dir()?;
    let config = MirageConfig::load(&cwd)?;
    let store = AnalysisStore::open(config.storage.resolved_db_path())?;

    let addr = format!(
        "{}:{}",
        config.server.resolved_host(),
        config.server.resolved_port()
    );
    let state = AppState::new(config, store);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "mirage server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
