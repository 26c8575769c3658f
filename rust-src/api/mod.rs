//! HTTP API: router, server loop and graceful shutdown.

mod error;
mod extract;
mod handlers;
mod params;
mod state;


use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, put},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

#[allow(unused_imports)]
pub use error::ApiError;
pub use state::{AppState, SharedState};

use crate::auth::HmacTokenVerifier;
use crate::config::{ServerConfig, CORS_MAX_AGE_SECS};
use crate::storage::Database;
use handlers::{
    create_traffic, delete_traffic, health, list_traffic, me, method_not_allowed, not_found,
    rollup_traffic, update_traffic,
};


/// Build the application router over shared state.
pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(CORS_MAX_AGE_SECS));

    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .route("/traffic", get(list_traffic).post(create_traffic))
        .route("/traffic/rollup", get(rollup_traffic))
        .route("/traffic/{id}", put(update_traffic).delete(delete_traffic))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}


/// Open the database and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: ServerConfig) -> Result<()> {
    info!("Opening database at {}", config.db_path.display());
    let db = Database::open(&config.db_path)?;
    let verifier = HmacTokenVerifier::new(&config.token_secret)?;
    let state = AppState::new(db, Box::new(verifier));

    let app = router(state);

    let address = config.bind_address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}


async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
}
