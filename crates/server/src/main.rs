use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spotlist_core::{
    load_config, load_config_from_env, validate_config, Config, SpotCatalog, SqliteSpotCatalog,
};
use spotlist_server::api::{create_router, create_static_router};
use spotlist_server::state::AppState;

/// Config file used when `SPOTLIST_CONFIG` is not set
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = resolve_config()?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    // Open the catalog; there is no fallback store, so failure is fatal
    let catalog = SqliteSpotCatalog::new(&config.database.path)
        .with_context(|| format!("Failed to open spot catalog at {:?}", config.database.path))?;
    let seeded = catalog
        .initialize(config.database.seed)
        .context("Failed to initialize spot catalog")?;
    info!("Spot catalog initialized ({} seed records inserted)", seeded);

    let state = Arc::new(AppState::new(Arc::new(catalog)));
    let app = create_router(state);

    let addr = config.server.addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Catalog server listening on {}", addr);

    let static_site = if config.static_site.enabled {
        let static_addr = config.static_site.addr();
        if !config.static_site.file.exists() {
            warn!(
                "Static file {:?} does not exist; {} will answer 404",
                config.static_site.file, static_addr
            );
        }
        let static_listener = TcpListener::bind(static_addr)
            .await
            .with_context(|| format!("Failed to bind static listener to {}", static_addr))?;
        info!(
            "Static server listening on {} (serving {:?})",
            static_addr, config.static_site.file
        );
        Some((
            static_listener,
            create_static_router(&config.static_site.file),
        ))
    } else {
        info!("Static listener disabled in config");
        None
    };

    // Both listeners stop on the same signal
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Server shutting down...");
        let _ = shutdown_tx.send(());
    });

    let catalog_server = {
        let shutdown = wait_for_shutdown(shutdown_rx.clone());
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
                .context("Catalog server error")
        }
    };

    let static_server = {
        let shutdown = wait_for_shutdown(shutdown_rx);
        async move {
            match static_site {
                Some((listener, router)) => axum::serve(listener, router)
                    .with_graceful_shutdown(shutdown)
                    .await
                    .context("Static server error"),
                None => Ok(()),
            }
        }
    };

    tokio::try_join!(catalog_server, static_server)?;
    info!("Servers stopped");

    Ok(())
}

/// Load the config file, falling back to defaults plus environment when the
/// implicit default file is absent.
fn resolve_config() -> Result<Config> {
    if let Ok(path) = std::env::var("SPOTLIST_CONFIG") {
        let path = PathBuf::from(path);
        info!("Loading configuration from {:?}", path);
        return load_config(&path)
            .with_context(|| format!("Failed to load config from {:?}", path));
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        info!("Loading configuration from {:?}", default_path);
        load_config(default_path)
            .with_context(|| format!("Failed to load config from {:?}", default_path))
    } else {
        info!("No {} found, using defaults and environment", DEFAULT_CONFIG_PATH);
        load_config_from_env().context("Failed to load config from environment")
    }
}

async fn wait_for_shutdown(mut rx: watch::Receiver<()>) {
    // Err means the sender is gone, which also ends the server
    let _ = rx.changed().await;
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
