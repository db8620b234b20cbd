//! Runs every uploaded resume through
//! save → extract → skills → persist → embed → score → persist.
//!
//! Resumes are processed one after another. A failure inside one resume is
//! logged and reported as an `"Error"` entry; only request-level storage
//! failures (wiping tables, recording the job) abort the submission.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use crate::extraction::{extract_text, ExtractionError};
use crate::matching::embedding::{semantic_similarity, Embedder, EmbeddingError};
use crate::matching::scoring::{as_percent, score_match, MatchScore, ScoringConfig};
use crate::matching::skills::SkillExtractor;
use crate::store::{self, NewMatch};
use crate::uploads::save_upload;

const ERROR_MARKER: &str = "Error";

/// Skill extraction, embedding and scoring, shared by all requests.
pub struct Matcher {
    skills: SkillExtractor,
    embedder: Arc<dyn Embedder>,
    scoring: ScoringConfig,
}

impl Matcher {
    pub fn new(scoring: ScoringConfig, embedder: Arc<dyn Embedder>) -> Result<Self, regex::Error> {
        Ok(Self {
            skills: SkillExtractor::new(&scoring.vocabulary)?,
            embedder,
            scoring,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.skills.vocabulary().count()
    }

    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        self.skills.extract(text)
    }

    /// Builds the per-request job profile. The fallback skills stand in when
    /// the description names none of the vocabulary.
    pub fn job_profile(&self, description: &str) -> JobProfile {
        let mut skills = self.extract_skills(description);
        if skills.is_empty() {
            skills = self.scoring.fallback_skills.clone();
        }
        JobProfile {
            description: description.to_string(),
            skills,
            embedding: OnceCell::new(),
        }
    }

    /// Scores resume text against a job. The job embedding is computed on
    /// first use and reused for the rest of the request.
    pub async fn score(
        &self,
        job: &JobProfile,
        resume_text: &str,
        resume_skills: &[String],
    ) -> Result<MatchScore, EmbeddingError> {
        let job_embedding = job
            .embedding
            .get_or_try_init(|| self.embedder.embed(&job.description))
            .await?;
        let resume_embedding = self.embedder.embed(resume_text).await?;
        let similarity = semantic_similarity(job_embedding, &resume_embedding)?;
        Ok(score_match(
            similarity,
            resume_skills,
            &job.skills,
            &self.scoring,
        ))
    }
}

/// A job description prepared for scoring.
pub struct JobProfile {
    description: String,
    skills: Vec<String>,
    embedding: OnceCell<Vec<f32>>,
}

impl JobProfile {
    pub fn skills(&self) -> &[String] {
        &self.skills
    }
}

/// One file from the multipart form.
#[derive(Debug, Clone)]
pub struct UploadedResume {
    pub filename: String,
    pub data: Bytes,
}

/// A validated submission ready to run.
#[derive(Debug, Clone)]
pub struct Submission {
    pub job_description: String,
    pub resumes: Vec<UploadedResume>,
    pub clear_database: bool,
}

/// Percentage score, or the literal `"Error"` for a failed resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportedScore {
    Percent(f64),
    Failed(&'static str),
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeResult {
    pub filename: String,
    pub similarity_score: ReportedScore,
    pub fit_label: String,
    pub skills: Vec<String>,
}

impl ResumeResult {
    fn failed(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            similarity_score: ReportedScore::Failed(ERROR_MARKER),
            fit_label: ERROR_MARKER.to_string(),
            skills: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("could not store upload: {0}")]
    Upload(#[from] std::io::Error),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Runs a whole submission and returns one result per uploaded file, in upload order.
pub async fn run_submission(
    pool: &SqlitePool,
    upload_dir: &Path,
    matcher: &Matcher,
    submission: Submission,
) -> Result<Vec<ResumeResult>, sqlx::Error> {
    if submission.clear_database {
        store::clear_all(pool).await?;
    }

    let job_id = store::insert_job_description(pool, &submission.job_description).await?;
    let job = matcher.job_profile(&submission.job_description);
    info!(
        "Scoring {} resume(s) against job {job_id} (skills: {})",
        submission.resumes.len(),
        job.skills().join(", ")
    );

    let mut results = Vec::with_capacity(submission.resumes.len());
    for resume in &submission.resumes {
        match process_resume(pool, upload_dir, matcher, job_id, &job, resume).await {
            Ok(result) => results.push(result),
            Err(e) => {
                error!("Error processing resume {}: {e}", resume.filename);
                results.push(ResumeResult::failed(&resume.filename));
            }
        }
    }
    Ok(results)
}

async fn process_resume(
    pool: &SqlitePool,
    upload_dir: &Path,
    matcher: &Matcher,
    job_id: i64,
    job: &JobProfile,
    resume: &UploadedResume,
) -> Result<ResumeResult, ResumeError> {
    let path = save_upload(upload_dir, &resume.filename, &resume.data).await?;
    let text = extract_text(&path).await?;
    if text.trim().is_empty() {
        warn!("No text extracted from {}", resume.filename);
    }

    let skills = matcher.extract_skills(&text);
    let resume_id = store::insert_resume(pool, &resume.filename, &text).await?;
    store::insert_skills(pool, resume_id, &skills).await?;

    let score = matcher.score(job, &text, &skills).await?;
    debug!(
        "{}: similarity {:.3}, skill match {:.3} ({})",
        resume.filename,
        score.similarity,
        score.skill_match,
        score.matched_skills.join(", ")
    );
    store::insert_match(
        pool,
        NewMatch {
            job_id,
            resume_id,
            score: score.final_score,
            label: score.label,
        },
    )
    .await?;

    Ok(ResumeResult {
        filename: resume.filename.clone(),
        similarity_score: ReportedScore::Percent(as_percent(score.final_score)),
        fit_label: score.label.to_string(),
        skills,
    })
}
