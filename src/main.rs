use anyhow::{Context, Result};
use axum::{Router, extract::FromRef};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;
use crate::store::CarStore;

// Declare modules
mod auth;
mod config;
mod error;
mod models;
mod query;
mod routes;
mod store;

// Shared application state injected into every handler.
#[derive(Clone, FromRef)]
struct AppState {
    settings: Arc<Settings>,
    store: Arc<CarStore>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carstock=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing carstock server...");

    // Load configuration
    let settings = match Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };
    let shared_settings = Arc::new(settings);

    // Open the document store (loads the snapshot file if present).
    let store = CarStore::open(&shared_settings.data_file)
        .with_context(|| format!("Failed to open store at {}", shared_settings.data_file))?;
    tracing::info!("Store opened from {}.", shared_settings.data_file);

    let app_state = AppState {
        settings: shared_settings.clone(),
        store: Arc::new(store),
    };

    let app: Router = routes::create_router(app_state);

    // Parse the server address from settings
    let addr: SocketAddr = shared_settings
        .server_address
        .parse()
        .with_context(|| {
            format!(
                "Invalid server address format in configuration ('{}')",
                shared_settings.server_address
            )
        })?;

    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => {
            tracing::info!("Server listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
