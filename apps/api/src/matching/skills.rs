//! Whole-word, case-insensitive skill lookup against the configured vocabulary.

use regex::{Regex, RegexBuilder};

/// A skill phrase paired with its compiled whole-word matcher.
#[derive(Debug, Clone)]
struct SkillPattern {
    canonical: String,
    regex: Regex,
}

/// Case-insensitive whole-word matcher over a fixed, ordered vocabulary.
///
/// Results always use the vocabulary spelling and follow vocabulary order,
/// never the order in which skills occur in the text.
#[derive(Debug, Clone)]
pub struct SkillExtractor {
    patterns: Vec<SkillPattern>,
}

impl SkillExtractor {
    pub fn new<I, S>(vocabulary: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns: Vec<SkillPattern> = Vec::new();
        for skill in vocabulary {
            let skill = skill.as_ref().trim();
            if skill.is_empty() || patterns.iter().any(|p| p.canonical == skill) {
                continue;
            }
            let regex = RegexBuilder::new(&word_pattern(skill))
                .case_insensitive(true)
                .build()?;
            patterns.push(SkillPattern {
                canonical: skill.to_string(),
                regex,
            });
        }
        Ok(Self { patterns })
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| p.regex.is_match(text))
            .map(|p| p.canonical.clone())
            .collect()
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.canonical.as_str())
    }
}

/// Anchors a skill on word boundaries. An edge that is itself punctuation
/// (the trailing `+` of `C++`) gets no boundary, since `\b` could never hold there.
fn word_pattern(skill: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let starts_word = skill.chars().next().is_some_and(is_word);
    let ends_word = skill.chars().last().is_some_and(is_word);
    format!(
        "{}{}{}",
        if starts_word { r"\b" } else { "" },
        regex::escape(skill),
        if ends_word { r"\b" } else { "" },
    )
}
