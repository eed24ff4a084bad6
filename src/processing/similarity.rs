//! Semantic similarity between two texts, with keyword-overlap fallback

use crate::error::{Result, ScreenerError};
use crate::processing::embeddings::{cosine_similarity, Embedder};
use crate::processing::round2;
use crate::processing::skills::SkillMatcher;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Score returned when the job text names no vocabulary skill and the
/// embedding capability is unavailable.
pub const NEUTRAL_FALLBACK_SCORE: f64 = 50.0;

/// Which path produced a similarity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringMode {
    Semantic,
    Fallback,
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMode::Semantic => write!(f, "semantic"),
            ScoringMode::Fallback => write!(f, "fallback"),
        }
    }
}

/// A similarity on the 0-100 scale, tagged with how it was computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Similarity {
    pub score: f64,
    pub mode: ScoringMode,
}

/// Computes text similarity through an injected embedder, degrading to
/// keyword overlap when the embedder is absent or failing.
#[derive(Clone)]
pub struct SimilarityProvider {
    embedder: Option<Arc<dyn Embedder>>,
    matcher: SkillMatcher,
}

impl SimilarityProvider {
    pub fn new(embedder: Option<Arc<dyn Embedder>>, matcher: SkillMatcher) -> Self {
        Self { embedder, matcher }
    }

    /// Provider that always scores by keyword overlap.
    pub fn keyword_only(matcher: SkillMatcher) -> Self {
        Self::new(None, matcher)
    }

    pub fn matcher(&self) -> &SkillMatcher {
        &self.matcher
    }

    pub fn embedder_name(&self) -> Option<&str> {
        self.embedder.as_deref().map(|e| e.name())
    }

    /// Similarity of `resume_text` to `job_text` on a 0-100 scale.
    ///
    /// Embedding failures fall back to keyword overlap. Only a broken
    /// embedding contract (wrong or mismatched vector lengths) is an error.
    pub fn similarity(&self, resume_text: &str, job_text: &str) -> Result<Similarity> {
        let Some(embedder) = self.embedder.as_deref() else {
            return Ok(self.fallback_similarity(resume_text, job_text));
        };

        let embeddings = embedder
            .embed(resume_text)
            .and_then(|resume| embedder.embed(job_text).map(|job| (resume, job)));

        let (resume_vec, job_vec) = match embeddings {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Embedding model '{}' failed, using keyword overlap: {}", embedder.name(), e);
                return Ok(self.fallback_similarity(resume_text, job_text));
            }
        };

        let expected = embedder.dimensions();
        if resume_vec.len() != expected || job_vec.len() != expected || expected == 0 {
            return Err(ScreenerError::EmbeddingContract(format!(
                "'{}' declared {} dimensions but returned {} and {}",
                embedder.name(),
                expected,
                resume_vec.len(),
                job_vec.len()
            )));
        }

        if resume_vec.iter().chain(&job_vec).any(|x| !x.is_finite()) {
            return Err(ScreenerError::EmbeddingContract(format!(
                "'{}' returned non-finite vector components",
                embedder.name()
            )));
        }

        let cosine = cosine_similarity(&resume_vec, &job_vec);
        Ok(Similarity {
            score: round2(cosine * 100.0).clamp(0.0, 100.0),
            mode: ScoringMode::Semantic,
        })
    }

    /// Keyword-overlap similarity: share of the job's vocabulary skills found
    /// in the resume, or [`NEUTRAL_FALLBACK_SCORE`] if the job names none.
    pub fn fallback_similarity(&self, resume_text: &str, job_text: &str) -> Similarity {
        let gap = self.matcher.gap(resume_text, job_text);
        let score = match gap.coverage() {
            Some(coverage) => round2(coverage * 100.0),
            None => NEUTRAL_FALLBACK_SCORE,
        };

        Similarity {
            score,
            mode: ScoringMode::Fallback,
        }
    }
}
