mod config;
mod db;
mod errors;
mod extraction;
mod matching;
mod routes;
mod state;
mod store;
mod uploads;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::matching::embedding::FastEmbedder;
use crate::matching::pipeline::Matcher;
use crate::routes::build_router;
use crate::state::AppState;
use crate::uploads::ensure_upload_dir;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Matcher API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // `matcher clear-db` wipes every table and exits.
    if std::env::args().nth(1).as_deref() == Some("clear-db") {
        store::clear_all(&db).await?;
        info!("Database cleared");
        return Ok(());
    }

    ensure_upload_dir(&config.upload_dir)
        .await
        .with_context(|| format!("Cannot create upload dir {}", config.upload_dir.display()))?;

    let cache_dir = config.model_cache_dir.clone();
    let embedder = tokio::task::spawn_blocking(move || FastEmbedder::load(&cache_dir))
        .await?
        .context("Failed to load embedding model")?;

    let matcher = Matcher::new(config.scoring.clone(), Arc::new(embedder))
        .context("Invalid skill vocabulary")?;
    info!(
        "Matcher ready: {} skills, weights {}/{} (similarity/skill), fit above {}",
        matcher.vocabulary_size(),
        config.scoring.similarity_weight,
        config.scoring.skill_weight,
        config.scoring.fit_threshold
    );

    let state = AppState {
        db,
        config: config.clone(),
        matcher: Arc::new(matcher),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
