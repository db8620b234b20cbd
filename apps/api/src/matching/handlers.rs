//! Axum route handlers for submissions, downloads and the dashboard.

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio_util::io::ReaderStream;

use crate::errors::AppError;
use crate::matching::pipeline::{run_submission, ResumeResult, Submission, UploadedResume};
use crate::state::AppState;
use crate::store::stats::{dashboard_stats, DashboardStats};
use crate::uploads::{sanitize_filename, upload_path};

const MISSING_INPUT: &str = "Please upload resumes and enter a job description.";

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub results: Vec<ResumeResult>,
}

/// POST /
///
/// Multipart form: `job_description`, one or more `resumes`, optional `clear_database`.
/// Every file gets an entry in `results`, in upload order.
pub async fn handle_submit(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let submission = read_submission(multipart).await?;

    let results = run_submission(
        &state.db,
        &state.config.upload_dir,
        &state.matcher,
        submission,
    )
    .await?;

    Ok(Json(SubmitResponse { results }))
}

/// Collects the form fields and rejects incomplete submissions before any file is touched.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut job_description = String::new();
    let mut clear_database = false;
    let mut resumes = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => {
                job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?
                    .trim()
                    .to_string();
            }
            "clear_database" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                clear_database = value.trim().eq_ignore_ascii_case("true");
            }
            "resumes" => {
                // An empty file input still sends a part, just without a name.
                let Some(filename) = field.file_name().and_then(sanitize_filename) else {
                    continue;
                };
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                resumes.push(UploadedResume { filename, data });
            }
            _ => {}
        }
    }

    if job_description.is_empty() || resumes.is_empty() {
        return Err(AppError::Validation(MISSING_INPUT.to_string()));
    }

    Ok(Submission {
        job_description,
        resumes,
        clear_database,
    })
}

/// GET /download/:filename
///
/// Streams a previously uploaded resume back as an attachment.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound("File not found".to_string());

    let path = upload_path(&state.config.upload_dir, &filename).ok_or_else(not_found)?;
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };
    if !file.metadata().await?.is_file() {
        return Err(not_found());
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("download")
        .replace('"', "");
    let content_type = mime_guess::from_path(&path).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}

/// GET /dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(dashboard_stats(&state.db).await?))
}
