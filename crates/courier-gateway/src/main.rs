use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use courier_channels::{BridgeTransport, Transport};
use courier_core::CourierConfig;
use courier_scheduler::{JobStore, SchedulerEngine};
use tracing::{info, warn};

mod app;
mod http;

#[derive(Debug, Parser)]
#[command(
    name = "courier-gateway",
    version,
    about = "Schedules chat messages over HTTP and delivers them when due"
)]
struct Args {
    /// Path to courier.toml (default: ~/.courier/courier.toml).
    #[arg(long, env = "COURIER_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "courier_gateway=info,courier_scheduler=info,tower_http=debug".into()
            }),
        )
        .init();

    let args = Args::parse();
    let config = CourierConfig::load(args.config.as_deref()).unwrap_or_else(|e| {
        warn!(code = e.code(), "Config load failed ({}), using defaults", e);
        CourierConfig::default()
    });

    let db_path = config.database.path.clone();
    ensure_parent_dir(&db_path)?;
    info!(path = %db_path, "opening SQLite database");
    let store = JobStore::open(&db_path)?;

    let transport: Arc<dyn Transport> = Arc::new(BridgeTransport::from_config(&config.transport)?);
    info!(bridge = %config.transport.bridge_url, "messaging transport configured");

    // scheduler engine shares the store with the HTTP handlers
    let engine = SchedulerEngine::new(store.clone(), Arc::clone(&transport))
        .with_poll_interval(config.poll_interval());
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let scheduler = tokio::spawn(engine.run(shutdown_rx));

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    let state = Arc::new(app::AppState::new(config, store, transport));
    let router = app::build_router(state);

    info!("Courier gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // signal scheduler to stop and wait for the in-flight tick
    let _ = shutdown_tx.send(true);
    if let Err(e) = scheduler.await {
        warn!("scheduler task ended abnormally: {e}");
    }
    info!("Courier gateway stopped");
    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) -> courier_core::Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
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
    info!("shutdown signal received");
}
