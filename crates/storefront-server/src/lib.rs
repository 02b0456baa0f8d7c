//! ============================================================================
//! STOREFRONT-SERVER: Favorites API
//! ============================================================================
//! `GET|PUT|POST|DELETE /api/favorites`, backed by the `favorites` cookie.
//! No server-side storage: the browser's cookie is the list.
//! ============================================================================

use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod routes;

pub use config::ServerConfig;

use routes::{add_favorite, get_favorites, put_favorites, remove_favorite};
use storefront_core::favorites::FAVORITES_PATH;

/// Router with the favorites endpoints and CORS
pub fn app() -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(
            FAVORITES_PATH,
            get(get_favorites)
                .put(put_favorites)
                .post(add_favorite)
                .delete(remove_favorite),
        )
        .layer(cors)
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    axum::serve(listener, app())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow!("Server error: {}", e))
}

pub async fn start_server(config: ServerConfig) -> Result<()> {
    let address = config.address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow!("Failed to bind {}: {}", address, e))?;
    info!("Server running on {address}");

    serve(listener, shutdown_signal()).await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
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
