// SWIFT Code Registry - Web Server

use anyhow::{Context, Result};
use swift_registry::api::{router, AppState};
use swift_registry::{load_csv, logging, ServerConfig, SwiftCodeRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = ServerConfig::from_env()?;
    let registry = SwiftCodeRegistry::new();

    // A bad data file is not fatal: the server starts empty and can be reloaded
    match load_csv(&config.data_file) {
        Ok(records) => match registry.adopt(records) {
            Ok(count) => tracing::info!(
                count,
                path = %config.data_file.display(),
                "loaded SWIFT code entries"
            ),
            Err(e) => tracing::error!(error = %e, "rejected startup dataset"),
        },
        Err(e) => tracing::error!(error = %e, "error loading data at startup"),
    }

    let app = router(AppState::new(registry), config.static_dir.clone());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(%addr, "server started");

    axum::serve(listener, app)
        .await
        .context("Server stopped with an error")?;

    Ok(())
}
