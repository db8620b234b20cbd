use axum::{http::StatusCode, response::Html, Json};
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-matcher"
    }))
}

/// GET /
pub async fn welcome_handler() -> Html<&'static str> {
    Html("<h1>Welcome to Resume Matcher API</h1><p>Use POST request to submit resumes.</p>")
}

/// GET /favicon.ico
pub async fn favicon_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}
