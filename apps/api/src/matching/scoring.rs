use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;

/// Keyword vocabulary scanned in both the job description and each resume.
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "Python",
    "Java",
    "C++",
    "SQL",
    "Machine Learning",
    "Data Analysis",
    "Django",
    "Flask",
    "JavaScript",
    "React",
    "Node.js",
    "Docker",
    "Kubernetes",
    "TensorFlow",
    "PyTorch",
    "Power BI",
    "Excel",
    "Git",
    "AWS",
    "Azure",
    "PowerPoint",
    "Bloomberg",
    "Thomson Reuters",
    "Net Asset Value",
    "PL allocations",
    "Accrual Reconciliations",
    "Auditor",
    "Reconciliations",
    "Investment Manager",
    "Operational deliverables",
];

/// Substituted for the job's skills when none of the vocabulary appears in it.
pub const DEFAULT_FALLBACK_SKILLS: &[&str] = &["Python", "Java", "SQL"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub vocabulary: Vec<String>,
    pub fallback_skills: Vec<String>,
    pub similarity_weight: f64,
    pub skill_weight: f64,
    pub fit_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            vocabulary: DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect(),
            fallback_skills: DEFAULT_FALLBACK_SKILLS.iter().map(|s| s.to_string()).collect(),
            similarity_weight: 0.6,
            skill_weight: 0.4,
            fit_threshold: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitLabel {
    Fit,
    NotFit,
}

impl FitLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitLabel::Fit => "Fit",
            FitLabel::NotFit => "Not Fit",
        }
    }
}

impl fmt::Display for FitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring one resume against one job description.
#[derive(Debug, Clone)]
pub struct MatchScore {
    pub similarity: f64,
    pub skill_match: f64,
    pub final_score: f64,
    pub label: FitLabel,
    pub matched_skills: Vec<String>,
}

/// Fraction of job skills that also appear among the resume skills.
/// Both sides are compared as sets. Returns 0 for an empty job skill set.
/// Matched skills are returned in job-skill order.
pub fn skill_match_score(resume_skills: &[String], job_skills: &[String]) -> (f64, Vec<String>) {
    let resume: HashSet<&str> = resume_skills.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let job: Vec<&str> = job_skills
        .iter()
        .map(String::as_str)
        .filter(|s| seen.insert(*s))
        .collect();

    if job.is_empty() {
        return (0.0, Vec::new());
    }

    let matched: Vec<String> = job
        .iter()
        .filter(|s| resume.contains(*s))
        .map(|s| s.to_string())
        .collect();
    (matched.len() as f64 / job.len() as f64, matched)
}

/// Cosine similarity of two equally sized vectors. A zero vector scores 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Weighted sum of semantic similarity and skill overlap. Not clamped.
pub fn fuse_scores(similarity: f64, skill_match: f64, config: &ScoringConfig) -> f64 {
    config.similarity_weight * similarity + config.skill_weight * skill_match
}

/// Strictly greater than the threshold is a fit; equality is not.
pub fn classify(final_score: f64, threshold: f64) -> FitLabel {
    if final_score > threshold {
        FitLabel::Fit
    } else {
        FitLabel::NotFit
    }
}

pub fn score_match(
    similarity: f64,
    resume_skills: &[String],
    job_skills: &[String],
    config: &ScoringConfig,
) -> MatchScore {
    let (skill_match, matched_skills) = skill_match_score(resume_skills, job_skills);
    let final_score = fuse_scores(similarity, skill_match, config);
    MatchScore {
        similarity,
        skill_match,
        final_score,
        label: classify(final_score, config.fit_threshold),
        matched_skills,
    }
}

/// Scales a 0–1 score to a percentage rounded to two decimals.
pub fn as_percent(score: f64) -> f64 {
    (score * 100.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_skill_match_two_of_three() {
        let (score, matched) = skill_match_score(
            &skills(&["Python", "SQL"]),
            &skills(&["Python", "SQL", "Docker"]),
        );
        assert!((score - 2.0 / 3.0).abs() < 1e-9, "Score was {score}");
        assert_eq!(matched, skills(&["Python", "SQL"]));
    }

    #[test]
    fn test_skill_match_empty_job_is_zero() {
        let (score, matched) = skill_match_score(&skills(&["Python"]), &[]);
        assert_eq!(score, 0.0);
        assert!(matched.is_empty());
    }

    #[test]
    fn test_skill_match_treats_job_as_set() {
        let (score, _) = skill_match_score(
            &skills(&["Python"]),
            &skills(&["Python", "Python", "Java"]),
        );
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_skill_match_bounded() {
        let (score, _) = skill_match_score(
            &skills(&["Python", "Java", "SQL", "Git"]),
            &skills(&["Python"]),
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        assert!((cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_fused_score_uses_default_weights() {
        let config = ScoringConfig::default();
        // 0.6*0.5 + 0.4*0.75 = 0.3 + 0.3 = 0.6
        let score = fuse_scores(0.5, 0.75, &config);
        assert!((score - 0.6).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_threshold_boundary_is_not_fit() {
        assert_eq!(classify(0.4, 0.4), FitLabel::NotFit);
        assert_eq!(classify(0.400_001, 0.4), FitLabel::Fit);
        assert_eq!(classify(0.1, 0.4), FitLabel::NotFit);
    }

    #[test]
    fn test_score_match_combines_everything() {
        let config = ScoringConfig::default();
        let score = score_match(
            0.5,
            &skills(&["Python", "SQL"]),
            &skills(&["Python", "SQL", "Docker"]),
            &config,
        );
        let expected = 0.6 * 0.5 + 0.4 * (2.0 / 3.0);
        assert!((score.final_score - expected).abs() < 1e-9);
        assert_eq!(score.label, FitLabel::Fit);
        assert_eq!(score.matched_skills, skills(&["Python", "SQL"]));
    }

    #[test]
    fn test_fit_label_display() {
        assert_eq!(FitLabel::NotFit.to_string(), "Not Fit");
        assert_eq!(FitLabel::Fit.to_string(), "Fit");
    }

    #[test]
    fn test_as_percent_rounds_two_decimals() {
        assert_eq!(as_percent(0.123456), 12.35);
        assert_eq!(as_percent(0.0), 0.0);
    }
}
