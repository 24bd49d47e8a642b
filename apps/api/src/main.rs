mod capture;
mod config;
mod db;
mod errors;
mod models;
mod render;
mod resume;
mod routes;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::capture::ChromiumCapture;
use crate::config::{Config, StoreBackend};
use crate::db::create_pool;
use crate::resume::service::ArtifactSettings;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{InMemoryResumeStore, PgResumeStore, ResumeStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the resume store
    let store: Arc<dyn ResumeStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;
            Arc::new(PgResumeStore::new(create_pool(database_url).await?))
        }
        StoreBackend::Memory => Arc::new(InMemoryResumeStore::new()),
    };
    info!("Resume store initialized ({})", store.backend_name());

    // Initialize PDF capture
    let capture = ChromiumCapture::new(config.chromium_path.clone(), config.capture_timeout)
        .with_no_sandbox(config.chromium_no_sandbox);
    info!(
        "PDF capture via '{}' (timeout {:?})",
        config.chromium_path, config.capture_timeout
    );

    tokio::fs::create_dir_all(&config.resume_output_dir)
        .await
        .with_context(|| {
            format!(
                "Could not create resume output directory {}",
                config.resume_output_dir.display()
            )
        })?;
    if !config.template_stylesheet.exists() {
        tracing::warn!(
            "Template stylesheet {} not found; PDF generation will fail until it exists",
            config.template_stylesheet.display()
        );
    }

    // Build app state
    let state = AppState {
        store,
        capture: Arc::new(capture),
        artifacts: ArtifactSettings {
            output_dir: config.resume_output_dir.clone(),
            stylesheet_path: config.template_stylesheet.clone(),
        },
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
