use anyhow::Result;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use lectern::routes::AppState;

pub async fn serve(
    config: lectern::config::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting lectern server...");

    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    // Write pool first: it creates the file and switches it to WAL
    let write_pool = lectern::db::create_write_pool(&config.database.url).await?;
    let read_pool =
        lectern::db::create_read_pool(&config.database.url, config.database.max_connections)
            .await?;

    let state = lectern_shared::State {
        read_db: read_pool.clone(),
        write_db: write_pool.clone(),
    };

    if config.root.password.is_empty() {
        tracing::warn!("root password not configured, skipping admin bootstrap");
    } else {
        lectern_identity::Command(state.clone())
            .ensure_root(&config.root.email, &config.root.password)
            .await?;
    }

    let app = lectern::router(AppState::new(config, state))
        .layer(CompressionLayer::new().br(true).gzip(true))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    let shutdown_signal = async {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for Ctrl+C: {e}");
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
                    tracing::error!("failed to install SIGTERM handler: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C signal");
            },
            _ = terminate => {
                tracing::info!("Received SIGTERM signal");
            },
        }

        tracing::info!("Starting graceful shutdown...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    tracing::info!("Closing database pools...");
    read_pool.close().await;
    write_pool.close().await;

    tracing::info!("Graceful shutdown complete");

    Ok(())
}
