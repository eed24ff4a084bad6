//! Shared helpers for integration tests

#![allow(dead_code)]

use resume_screener::config::{Config, ScoringConfig};
use resume_screener::processing::decision::DecisionClassifier;
use resume_screener::processing::embeddings::{Embedder, EmbeddingError};
use resume_screener::processing::profile::{CandidateProfile, GroundTruth, LabeledCandidate};
use resume_screener::processing::scorer::CompositeScorer;
use resume_screener::processing::similarity::SimilarityProvider;
use resume_screener::processing::skills::SkillMatcher;
use std::collections::HashMap;
use std::sync::Arc;

/// Job texts start with this phrase and embed as the unit x vector.
pub const JOB_PREFIX: &str = "We are hiring";

/// Two-dimensional embedder with a scripted cosine per candidate.
///
/// Texts starting with [`JOB_PREFIX`] embed as `[1, 0]`. Any other text is
/// looked up by its first line and embeds as `[c, sqrt(1 - c^2)]`, so its
/// cosine against a job is exactly `c`. Unknown names embed orthogonally.
pub struct ScriptedEmbedder {
    cosines: HashMap<String, f32>,
}

impl ScriptedEmbedder {
    pub fn new(cosines: &[(&str, f32)]) -> Self {
        Self {
            cosines: cosines
                .iter()
                .map(|(name, cosine)| (name.to_string(), *cosine))
                .collect(),
        }
    }
}

impl Embedder for ScriptedEmbedder {
    fn name(&self) -> &str {
        "scripted"
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.starts_with(JOB_PREFIX) {
            return Ok(vec![1.0, 0.0]);
        }
        let first_line = text.lines().next().unwrap_or("").trim();
        let cosine = self.cosines.get(first_line).copied().unwrap_or(0.0);
        Ok(vec![cosine, (1.0 - cosine * cosine).max(0.0).sqrt()])
    }
}

/// Embedder whose model is never reachable.
pub struct UnavailableEmbedder;

impl Embedder for UnavailableEmbedder {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Unavailable("model offline".to_string()))
    }
}

/// Embedder that returns `broken_vector` for one candidate, such as a vector
/// of the wrong length or with NaN components.
pub struct MisshapenEmbedder {
    pub inner: ScriptedEmbedder,
    pub broken_name: String,
    pub broken_vector: Vec<f32>,
}

impl Embedder for MisshapenEmbedder {
    fn name(&self) -> &str {
        "misshapen"
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.lines().next().map(str::trim) == Some(self.broken_name.as_str()) {
            return Ok(self.broken_vector.clone());
        }
        self.inner.embed(text)
    }
}

pub fn matcher() -> SkillMatcher {
    SkillMatcher::with_default_vocabulary().expect("default vocabulary compiles")
}

pub fn provider(embedder: impl Embedder + 'static) -> SimilarityProvider {
    let embedder: Arc<dyn Embedder> = Arc::new(embedder);
    SimilarityProvider::new(Some(embedder), matcher())
}

pub fn scorer(embedder: impl Embedder + 'static) -> CompositeScorer {
    CompositeScorer::new(
        provider(embedder),
        ScoringConfig::default(),
        DecisionClassifier::new(Config::default().thresholds),
    )
}

pub fn candidate(name: &str, experience: &str, education: &str, label: &str) -> LabeledCandidate {
    LabeledCandidate {
        profile: CandidateProfile {
            name: name.to_string(),
            skills: "Python, Machine Learning, SQL".to_string(),
            experience: experience.to_string(),
            education: education.to_string(),
            certifications: "AWS Certified".to_string(),
            job_role: "Data Scientist".to_string(),
        },
        ground_truth: GroundTruth::parse(label),
    }
}

/// Four candidates whose composite scores are 82, 28, 55 and 29.
pub fn four_candidates() -> (ScriptedEmbedder, Vec<LabeledCandidate>) {
    let embedder = ScriptedEmbedder::new(&[
        ("Avery Stone", 0.70),
        ("Blake Rivers", 0.30),
        ("Casey Moreau", 0.50),
        ("Devon Park", 0.20),
    ]);
    let records = vec![
        candidate("Avery Stone", "12", "PhD", "Hire"),
        candidate("Blake Rivers", "2", "High School", "Reject"),
        candidate("Casey Moreau", "6", "Bachelor", "Hire"),
        candidate("Devon Park", "1", "Master", "Reject"),
    ];
    (embedder, records)
}
