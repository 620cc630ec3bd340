//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::{Config, SessionBackend};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, MemorySessionStore, RedisSessionStore, SessionStore};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    // Initialize database (pending migrations are applied on connect)
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    tracing::info!("Database connected");

    let sessions = session_store(&config).await?;

    let addr = config.server_addr();
    let app_state = AppState::from_config(Arc::new(db), sessions, config);

    // Build router
    let app = create_router(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

async fn session_store(config: &Config) -> AppResult<Arc<dyn SessionStore>> {
    match config.session_backend {
        SessionBackend::Redis => {
            let store = RedisSessionStore::connect(config)
                .await
                .map_err(|e| AppError::session(format!("Redis connection failed: {}", e)))?;
            Ok(Arc::new(store))
        }
        SessionBackend::Memory => {
            tracing::warn!("Using in-memory sessions; they are lost on restart");
            Ok(Arc::new(MemorySessionStore::new()))
        }
    }
}
