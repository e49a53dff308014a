use climate_api::config::Config;
use climate_api::db::{self, Repository};
use climate_api::routes;
use climate_api::service::ClimateService;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,climate_api=debug,sqlx=warn")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Climate API starting...");

    let config_path =
        std::env::var("CLIMATE_API_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to load configuration from {}: {}\n\n\
             Make sure:\n\
             1. the file exists (or set CLIMATE_API_CONFIG)\n\
             2. All referenced environment variables are set (check .env.example)",
            config_path,
            e
        )
    })?;
    info!("Configuration loaded from {}", config_path);

    let pool = db::connect(&config.database)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to open dataset: {}\n\n\
                 Path: {}\n\n\
                 Common fixes:\n\
                 1. Check database.path in the configuration\n\
                 2. Run from the directory the relative path is based on",
                e,
                config.database.path
            )
        })?;

    let repository = Arc::new(Repository::new(pool));
    let station_count = repository.count_stations().await?;
    info!(
        "Opened dataset {} ({} stations)",
        config.database.path, station_count
    );

    let service = ClimateService::new(repository);
    let app = routes::app(service);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    info!("Climate API shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown");
        }
    }
}
