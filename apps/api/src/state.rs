use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::matching::pipeline::Matcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    /// Skill vocabulary, scoring weights and the embedding model, loaded once at startup.
    pub matcher: Arc<Matcher>,
}
