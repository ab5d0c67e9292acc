//! ddx-server: diagnosis gateway binary entrypoint.

use std::net::SocketAddr;

use ddx_server::config::{self, Config};
use ddx_server::logging;

#[tokio::main]
async fn main() {
    let env_file = config::load_env_file(config::ENV_FILE);

    let log_dir = logging::log_dir();
    let _log_guards = logging::init(&log_dir).expect("Failed to open log files");

    match env_file {
        Ok(true) => tracing::info!(file = config::ENV_FILE, "Loaded environment file"),
        Ok(false) => tracing::info!(file = config::ENV_FILE, "No environment file, using process env"),
        Err(e) => tracing::warn!(file = config::ENV_FILE, error = %e, "Failed to read environment file"),
    }
    tracing::info!(dir = %log_dir.display(), "Writing ddx and ttx logs");

    let config = Config::from_env();

    let pool = ddx_server::db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    if config.apply_schema {
        match ddx_server::db::apply_schema(&pool).await {
            Ok(()) => tracing::info!("Concept schema applied"),
            Err(e) => tracing::error!(error = %e, "Failed to apply concept schema"),
        }
    }

    tracing::info!(
        ddx_url = %config.ddx.url,
        ttx_url = %config.ttx.url,
        retries = config.retry.total,
        "Model endpoints configured"
    );
    tracing::info!("Rate limiting: {} requests/second", config.rate_limit_rps);

    let app = ddx_server::build_app(pool, &config).expect("Failed to build HTTP clients");

    let addr: SocketAddr = config.bind_address.parse().expect("Invalid bind address");
    tracing::info!("Starting ddx server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shutdown complete");
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
