//! Router assembly and the serve loop

use crate::config::ServerConfig;
use crate::handlers::{log_request, post_name};
use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get_service, post};
use axum::{middleware, Router};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::services::ServeFile;
use tracing::{error, info};

/// Build the application router
///
/// - `GET /` serves `index.html` from the views directory
/// - `POST /name` echoes the submitted name
pub fn router(config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get_service(ServeFile::new(config.index_path())))
        .route("/name", post(post_name))
        .layer(DefaultBodyLimit::max(config.body_limit))
        .layer(middleware::from_fn(log_request))
}

/// Bind and serve until `shutdown` resolves
pub async fn serve<F>(config: ServerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(&config);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.host, config.port))?;
    let local = listener.local_addr().context("Failed to read bound address")?;

    info!(addr = %local, views = %config.views_dir.display(), "Form server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .context("HTTP server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
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
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
