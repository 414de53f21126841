//! # Toko API Server
//!
//! ```text
//! load config ─► open database (migrate) ─► seed? ─► serve ─► drain ─► close
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use toko_api::{router, ApiConfig, AppState};
use toko_db::seed::{seed_reference_data, SeedOutcome};
use toko_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    toko_api::init_tracing();

    info!("Starting Toko API server...");

    let config = ApiConfig::load()?;
    let addr = config.bind_addr()?;
    info!(
        %addr,
        database = %config.database_path.display(),
        "Configuration loaded"
    );

    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.max_connections),
    )
    .await?;
    info!("Database connected and migrations applied");

    if config.seed {
        if let SeedOutcome::Seeded { sales, .. } = seed_reference_data(&db).await? {
            info!(sales, "Reference data loaded");
        }
    }

    let app = router(AppState::new(db.clone()), config.request_timeout());

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
