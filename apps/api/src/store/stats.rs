use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::matching::scoring::as_percent;

const TOP_SKILLS_LIMIT: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SkillCount {
    pub skill: String,
    pub count: i64,
}

/// Aggregate view served by `GET /dashboard`.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_jobs: i64,
    pub total_resumes: i64,
    pub fit_distribution: BTreeMap<String, i64>,
    /// Mean fused score across all matches, as a percentage. 0 when there are none.
    pub avg_similarity: f64,
    pub top_skills: Vec<SkillCount>,
}

pub async fn dashboard_stats(pool: &SqlitePool) -> Result<DashboardStats, sqlx::Error> {
    let total_jobs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_descriptions")
        .fetch_one(pool)
        .await?;

    let total_resumes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes")
        .fetch_one(pool)
        .await?;

    let fit_distribution: BTreeMap<String, i64> = sqlx::query_as::<_, (String, i64)>(
        "SELECT fit_label, COUNT(*) FROM matches GROUP BY fit_label",
    )
    .fetch_all(pool)
    .await?
    .into_iter()
    .collect();

    let avg: Option<f64> = sqlx::query_scalar("SELECT AVG(similarity_score) FROM matches")
        .fetch_one(pool)
        .await?;

    // Ties resolved alphabetically so the ranking is stable.
    let top_skills = sqlx::query_as::<_, SkillCount>(
        r#"
        SELECT skill, COUNT(*) AS count
        FROM skills
        GROUP BY skill
        ORDER BY count DESC, skill ASC
        LIMIT ?
        "#,
    )
    .bind(TOP_SKILLS_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(DashboardStats {
        total_jobs,
        total_resumes,
        fit_distribution,
        avg_similarity: avg.map(as_percent).unwrap_or(0.0),
        top_skills,
    })
}
