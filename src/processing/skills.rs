//! Skill vocabulary matching between resume and job description texts

use crate::config::SkillsConfig;
use crate::error::{Result, ScreenerError};
use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Skill tokens looked for in job descriptions, in reporting order.
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "python", "java", "javascript", "react", "sql", "mysql",
    "fastapi", "docker", "aws", "git", "html", "css",
    "machine learning", "ai", "data analysis", "frontend",
    "backend", "full stack", "api", "database", "tensorflow",
    "pytorch", "nlp", "deep learning", "cybersecurity", "networking",
    "linux", "c++", "c#", "php", "node", "angular", "vue",
];

/// How a vocabulary token is located in a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Plain substring containment: "java" is found inside "javascript".
    Substring,
    /// Whole-token containment: the token must not touch letters, digits, `+` or `#`.
    Token,
}

/// Required, matched and missing skills, each in vocabulary order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    pub required: Vec<String>,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl SkillGap {
    /// Share of required skills present in the resume, as a fraction.
    pub fn coverage(&self) -> Option<f64> {
        if self.required.is_empty() {
            None
        } else {
            Some(self.matched.len() as f64 / self.required.len() as f64)
        }
    }
}

#[derive(Clone)]
enum Searcher {
    Substring(AhoCorasick),
    Token(Vec<Regex>),
}

/// Matches a fixed, ordered skill vocabulary against free text.
#[derive(Clone)]
pub struct SkillMatcher {
    vocabulary: Vec<String>,
    strategy: MatchStrategy,
    searcher: Searcher,
}

impl std::fmt::Debug for SkillMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillMatcher")
            .field("vocabulary", &self.vocabulary)
            .field("strategy", &self.strategy)
            .finish()
    }
}

impl SkillMatcher {
    pub fn new<S: AsRef<str>>(vocabulary: &[S], strategy: MatchStrategy) -> Result<Self> {
        let mut tokens: Vec<String> = Vec::with_capacity(vocabulary.len());
        for token in vocabulary {
            let token = token.as_ref().trim().to_lowercase();
            if !token.is_empty() && !tokens.contains(&token) {
                tokens.push(token);
            }
        }

        let searcher = match strategy {
            MatchStrategy::Substring => {
                // Standard match kind is required for overlapping search, which
                // reports every token contained in the text ("java" and "javascript").
                let automaton = AhoCorasick::builder()
                    .match_kind(MatchKind::Standard)
                    .build(&tokens)
                    .map_err(|e| {
                        let message = format!("Failed to build skill matcher: {}", e);
                        ScreenerError::Configuration(message)
                    })?;
                Searcher::Substring(automaton)
            }
            MatchStrategy::Token => {
                let patterns = tokens
                    .iter()
                    .map(|token| {
                        Regex::new(&format!(
                            r"(?:^|[^\p{{L}}\p{{N}}+#]){}(?:$|[^\p{{L}}\p{{N}}+#])",
                            regex::escape(token)
                        ))
                        .map_err(|e| {
                            ScreenerError::Configuration(format!(
                                "Invalid skill token '{}': {}",
                                token, e
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Searcher::Token(patterns)
            }
        };

        Ok(Self {
            vocabulary: tokens,
            strategy,
            searcher,
        })
    }

    /// Matcher over [`DEFAULT_VOCABULARY`] with substring semantics.
    pub fn with_default_vocabulary() -> Result<Self> {
        Self::new(DEFAULT_VOCABULARY, MatchStrategy::Substring)
    }

    pub fn from_config(config: &SkillsConfig) -> Result<Self> {
        Self::new(config.vocabulary.as_slice(), config.strategy)
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// One flag per vocabulary token: is it present in `text`?
    fn presence(&self, text: &str) -> Vec<bool> {
        let lowered = text.to_lowercase();
        let mut present = vec![false; self.vocabulary.len()];

        match &self.searcher {
            Searcher::Substring(automaton) => {
                for mat in automaton.find_overlapping_iter(&lowered) {
                    present[mat.pattern().as_usize()] = true;
                }
            }
            Searcher::Token(patterns) => {
                for (flag, pattern) in present.iter_mut().zip(patterns) {
                    *flag = pattern.is_match(&lowered);
                }
            }
        }

        present
    }

    /// Vocabulary tokens that appear in the job text.
    pub fn required_skills(&self, job_text: &str) -> Vec<String> {
        self.presence(job_text)
            .into_iter()
            .zip(&self.vocabulary)
            .filter_map(|(present, token)| present.then(|| token.clone()))
            .collect()
    }

    pub fn gap(&self, resume_text: &str, job_text: &str) -> SkillGap {
        let in_job = self.presence(job_text);
        let in_resume = self.presence(resume_text);

        let mut gap = SkillGap::default();
        for (i, token) in self.vocabulary.iter().enumerate() {
            if !in_job[i] {
                continue;
            }
            gap.required.push(token.clone());
            if in_resume[i] {
                gap.matched.push(token.clone());
            } else {
                gap.missing.push(token.clone());
            }
        }
        gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_matched_missing() {
        let matcher = SkillMatcher::with_default_vocabulary().unwrap();
        let gap = matcher.gap("I know Python and Java", "Required Skills: Python, SQL");

        assert_eq!(gap.required, vec!["python", "sql"]);
        assert_eq!(gap.matched, vec!["python"]);
        assert_eq!(gap.missing, vec!["sql"]);
        assert_eq!(gap.coverage(), Some(0.5));
    }

    #[test]
    fn test_vocabulary_order_not_text_order() {
        let matcher = SkillMatcher::with_default_vocabulary().unwrap();
        let required = matcher.required_skills("Vue, Docker and Python wanted");
        assert_eq!(required, vec!["python", "docker", "vue"]);
    }

    #[test]
    fn test_substring_semantics_are_naive() {
        let matcher = SkillMatcher::with_default_vocabulary().unwrap();
        let required = matcher.required_skills("Senior JavaScript engineer");
        // "java" is contained in "javascript"
        assert!(required.contains(&"java".to_string()));
        assert!(required.contains(&"javascript".to_string()));
    }

    #[test]
    fn test_empty_inputs() {
        let matcher = SkillMatcher::with_default_vocabulary().unwrap();
        let gap = matcher.gap("", "");
        assert!(gap.required.is_empty());
        assert!(gap.matched.is_empty());
        assert!(gap.missing.is_empty());
        assert_eq!(gap.coverage(), None);

        let gap = matcher.gap("", "Python and SQL");
        assert_eq!(gap.missing, vec!["python", "sql"]);
    }

    #[test]
    fn test_token_strategy_respects_boundaries() {
        let matcher = SkillMatcher::new(DEFAULT_VOCABULARY, MatchStrategy::Token).unwrap();
        let required =
            matcher.required_skills("Senior JavaScript engineer, C++ and Node.js, email us");

        assert!(required.contains(&"javascript".to_string()));
        assert!(!required.contains(&"java".to_string()));
        assert!(required.contains(&"c++".to_string()));
        assert!(required.contains(&"node".to_string()));
        assert!(!required.contains(&"ai".to_string()));
    }

    #[test]
    fn test_custom_vocabulary_is_normalized() {
        let matcher =
            SkillMatcher::new(&["Rust", " rust ", "Go"][..], MatchStrategy::Substring).unwrap();
        assert_eq!(matcher.vocabulary(), &["rust".to_string(), "go".to_string()]);
    }
}
