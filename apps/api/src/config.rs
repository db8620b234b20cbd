use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::matching::scoring::ScoringConfig;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub model_cache_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
    pub scoring: ScoringConfig,
}

/// Layout of the optional `MATCHER_CONFIG` TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    scoring: ScoringConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let scoring = match std::env::var("MATCHER_CONFIG") {
            Ok(path) => load_scoring_file(Path::new(&path))?,
            Err(_) => ScoringConfig::default(),
        };
        validate_scoring(&scoring)?;

        Ok(Config {
            database_url: env_or("DATABASE_URL", "sqlite://resume_matcher.db"),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads")),
            model_cache_dir: PathBuf::from(env_or("MODEL_CACHE_DIR", ".fastembed_cache")),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            port: env_or("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            scoring,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn load_scoring_file(path: &Path) -> Result<ScoringConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_scoring_toml(&raw).with_context(|| format!("Invalid config file '{}'", path.display()))
}

fn parse_scoring_toml(raw: &str) -> Result<ScoringConfig> {
    let file: FileConfig = toml::from_str(raw)?;
    Ok(file.scoring)
}

fn validate_scoring(scoring: &ScoringConfig) -> Result<()> {
    if scoring.vocabulary.iter().all(|s| s.trim().is_empty()) {
        bail!("scoring.vocabulary must contain at least one skill");
    }
    if scoring.fallback_skills.iter().all(|s| s.trim().is_empty()) {
        bail!("scoring.fallback_skills must contain at least one skill");
    }
    // Resume skills only ever come from the vocabulary, so anything else can never match.
    if let Some(stray) = scoring
        .fallback_skills
        .iter()
        .find(|skill| !scoring.vocabulary.iter().any(|v| v.trim() == skill.as_str()))
    {
        bail!("scoring.fallback_skills entry {stray:?} is not in scoring.vocabulary");
    }
    for (name, value) in [
        ("similarity_weight", scoring.similarity_weight),
        ("skill_weight", scoring.skill_weight),
        ("fit_threshold", scoring.fit_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            bail!("scoring.{name} must be within [0, 1], got {value}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let scoring = parse_scoring_toml("").unwrap();
        assert_eq!(scoring.similarity_weight, 0.6);
        assert_eq!(scoring.skill_weight, 0.4);
        assert_eq!(scoring.fit_threshold, 0.4);
        assert_eq!(scoring.fallback_skills, vec!["Python", "Java", "SQL"]);
        assert!(scoring.vocabulary.contains(&"Docker".to_string()));
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let scoring = parse_scoring_toml(
            r#"
            [scoring]
            vocabulary = ["Rust", "Go"]
            fit_threshold = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(scoring.vocabulary, vec!["Rust", "Go"]);
        assert_eq!(scoring.fit_threshold, 0.5);
        assert_eq!(scoring.similarity_weight, 0.6);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(parse_scoring_toml("[scoring]\nthreshold = 0.3\n").is_err());
    }

    #[test]
    fn test_validation_rejects_out_of_range_weight() {
        let scoring = ScoringConfig {
            skill_weight: 1.5,
            ..ScoringConfig::default()
        };
        assert!(validate_scoring(&scoring).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_vocabulary() {
        let scoring = ScoringConfig {
            vocabulary: vec![],
            ..ScoringConfig::default()
        };
        assert!(validate_scoring(&scoring).is_err());
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_validation_rejects_fallback_outside_vocabulary() {
        let scoring = parse_scoring_toml(
            r#"
            [scoring]
            vocabulary = ["Rust", "Go"]
            "#,
        )
        .unwrap();
        let err = validate_scoring(&scoring).unwrap_err();
        assert!(err.to_string().contains("\"Python\""), "Got {err}");

        let scoring = ScoringConfig {
            vocabulary: vec!["Rust".into(), "Go".into()],
            fallback_skills: vec!["Go".into()],
            ..ScoringConfig::default()
        };
        assert!(validate_scoring(&scoring).is_ok());
    }
}
