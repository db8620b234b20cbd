//! SQLite writes for job descriptions, resumes, skills and match results.
//!
//! Every insert commits on its own; nothing here spans a whole request.

pub mod stats;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::matching::scoring::FitLabel;

/// Tables in child-before-parent order so deletes never violate foreign keys.
const TABLES: [&str; 4] = ["skills", "matches", "resumes", "job_descriptions"];

pub async fn insert_job_description(
    pool: &SqlitePool,
    description: &str,
) -> Result<i64, sqlx::Error> {
    let id = sqlx::query("INSERT INTO job_descriptions (description, created_at) VALUES (?, ?)")
        .bind(description)
        .bind(Utc::now())
        .execute(pool)
        .await?
        .last_insert_rowid();
    debug!("Inserted job description {id}");
    Ok(id)
}

pub async fn insert_resume(
    pool: &SqlitePool,
    filename: &str,
    text: &str,
) -> Result<i64, sqlx::Error> {
    let id = sqlx::query("INSERT INTO resumes (filename, text, created_at) VALUES (?, ?, ?)")
        .bind(filename)
        .bind(text)
        .bind(Utc::now())
        .execute(pool)
        .await?
        .last_insert_rowid();
    debug!("Inserted resume {id} ({filename})");
    Ok(id)
}

/// One row per skill; repeated calls for the same resume add more rows.
pub async fn insert_skills(
    pool: &SqlitePool,
    resume_id: i64,
    skills: &[String],
) -> Result<(), sqlx::Error> {
    for skill in skills {
        sqlx::query("INSERT INTO skills (resume_id, skill) VALUES (?, ?)")
            .bind(resume_id)
            .bind(skill)
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Parameters for recording one scoring event.
pub struct NewMatch {
    pub job_id: i64,
    pub resume_id: i64,
    pub score: f64,
    pub label: FitLabel,
}

/// Appends a match. Re-scoring the same pair adds a new row, never overwrites.
pub async fn insert_match(pool: &SqlitePool, new_match: NewMatch) -> Result<i64, sqlx::Error> {
    let NewMatch {
        job_id,
        resume_id,
        score,
        label,
    } = new_match;
    let id = sqlx::query(
        r#"
        INSERT INTO matches (job_id, resume_id, similarity_score, fit_label, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(job_id)
    .bind(resume_id)
    .bind(score)
    .bind(label.as_str())
    .bind(Utc::now())
    .execute(pool)
    .await?
    .last_insert_rowid();
    debug!("Inserted match {id}: job {job_id} / resume {resume_id} = {score:.4} ({label})");
    Ok(id)
}

/// Empties all four tables. Not isolated from submissions running concurrently.
pub async fn clear_all(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for table in TABLES {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    info!("Cleared all matcher tables");
    Ok(())
}
