//! ff-server: HTTP pages and JSON API over the catalog.
//!
//! This crate wires the `ff-db` query layer to an Axum router. It provides:
//!
//! - server-rendered HTML pages (maud) for browsing books and reviews
//! - a read-only JSON API with a generated OpenAPI document
//! - request-id tracing and graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod routes;

use std::net::SocketAddr;

use ff_core::config::Config;

use crate::context::AppContext;

/// Start the catalog server.
///
/// Opens the database (running migrations), seeds empty tables when
/// `seed.on_startup` is set, then serves HTTP until SIGINT or SIGTERM.
pub async fn start(config: Config) -> ff_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let db_path = &config.database.path;
    let existed = db_path.exists();
    let db = ff_db::pool::init_pool(&config.database)?;
    if existed {
        tracing::info!("Database opened (existing) at {}", db_path.display());
    } else {
        tracing::info!("Database created (new) at {}", db_path.display());
    }

    if config.seed.on_startup {
        let conn = ff_db::pool::get_conn(&db)?;
        ff_db::seed::seed_if_empty(&conn, config.seed.effective_bcrypt_cost())?;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| ff_core::Error::Validation(format!("Invalid server address: {e}")))?;

    let ctx = AppContext { db };
    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ff_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ff_core::Error::Internal(format!("Server error: {e}")))?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
