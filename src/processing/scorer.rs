//! Composite candidate scoring: weighted similarity plus experience and education bonuses

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::processing::decision::{Decision, DecisionClassifier, DecisionPolicy};
use crate::processing::profile::{CandidateProfile, JobDescription};
use crate::processing::round2;
use crate::processing::similarity::{ScoringMode, Similarity, SimilarityProvider};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Similarity on the 0-100 scale, before weighting.
    pub semantic_component: f64,
    pub experience_bonus: f64,
    pub education_bonus: f64,
    pub final_score: f64,
    pub scoring_mode: ScoringMode,
}

/// Full outcome of matching one candidate against one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate: String,
    pub job_title: String,
    pub breakdown: ScoreBreakdown,
    pub decision: Decision,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl MatchResult {
    pub fn final_score(&self) -> f64 {
        self.breakdown.final_score
    }
}

#[derive(Clone)]
pub struct CompositeScorer {
    similarity: SimilarityProvider,
    config: ScoringConfig,
    classifier: DecisionClassifier,
}

impl CompositeScorer {
    pub fn new(
        similarity: SimilarityProvider,
        config: ScoringConfig,
        classifier: DecisionClassifier,
    ) -> Self {
        Self {
            similarity,
            config,
            classifier,
        }
    }

    pub fn similarity_provider(&self) -> &SimilarityProvider {
        &self.similarity
    }

    pub fn classifier(&self) -> &DecisionClassifier {
        &self.classifier
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, candidate: &CandidateProfile, job_text: &str) -> Result<ScoreBreakdown> {
        let similarity = self.similarity.similarity(&candidate.resume_text(), job_text)?;
        Ok(self.combine(candidate, similarity))
    }

    /// Score using keyword overlap only. Never fails.
    pub fn score_fallback(&self, candidate: &CandidateProfile, job_text: &str) -> ScoreBreakdown {
        let similarity = self
            .similarity
            .fallback_similarity(&candidate.resume_text(), job_text);
        self.combine(candidate, similarity)
    }

    fn combine(&self, candidate: &CandidateProfile, similarity: Similarity) -> ScoreBreakdown {
        let experience_bonus = self.experience_bonus(candidate.experience_years());
        let education_bonus = self.education_bonus(&candidate.education);
        let weighted = similarity.score * self.config.semantic_weight;
        let final_score = round2(weighted + experience_bonus + education_bonus);

        debug!(
            "Scored '{}': semantic={:.2} ({}), experience={}, education={}, final={:.2}",
            candidate.name,
            similarity.score,
            similarity.mode,
            experience_bonus,
            education_bonus,
            final_score
        );

        ScoreBreakdown {
            semantic_component: similarity.score,
            experience_bonus,
            education_bonus,
            final_score,
            scoring_mode: similarity.mode,
        }
    }

    /// Bonus of the highest tier whose minimum is met, in whatever order
    /// the tiers are configured.
    pub fn experience_bonus(&self, years: Option<u64>) -> f64 {
        years
            .and_then(|years| {
                self.config
                    .experience_tiers
                    .iter()
                    .filter(|tier| years >= u64::from(tier.min_years))
                    .max_by_key(|tier| tier.min_years)
            })
            .map(|tier| tier.bonus)
            .unwrap_or(self.config.experience_default_bonus)
    }

    /// Bonus of the first tier with a term contained in the education text.
    pub fn education_bonus(&self, education: &str) -> f64 {
        let education = education.to_lowercase();
        self.config
            .education_tiers
            .iter()
            .find(|tier| {
                tier.terms
                    .iter()
                    .any(|term| education.contains(term.to_lowercase().as_str()))
            })
            .map(|tier| tier.bonus)
            .unwrap_or(self.config.education_default_bonus)
    }

    /// Score, classify and compute the skill gap in one pass.
    pub fn match_candidate(
        &self,
        candidate: &CandidateProfile,
        job: &JobDescription,
        policy: DecisionPolicy,
    ) -> Result<MatchResult> {
        let breakdown = self.score(candidate, job.text())?;
        Ok(self.assemble(candidate, job, policy, breakdown))
    }

    /// [`CompositeScorer::match_candidate`] on the keyword-overlap path.
    pub fn match_candidate_fallback(
        &self,
        candidate: &CandidateProfile,
        job: &JobDescription,
        policy: DecisionPolicy,
    ) -> MatchResult {
        let breakdown = self.score_fallback(candidate, job.text());
        self.assemble(candidate, job, policy, breakdown)
    }

    fn assemble(
        &self,
        candidate: &CandidateProfile,
        job: &JobDescription,
        policy: DecisionPolicy,
        breakdown: ScoreBreakdown,
    ) -> MatchResult {
        let gap = self
            .similarity
            .matcher()
            .gap(&candidate.resume_text(), job.text());

        MatchResult {
            candidate: candidate.name.clone(),
            job_title: job.title.clone(),
            decision: self.classifier.classify(policy, breakdown.final_score),
            breakdown,
            matched_skills: gap.matched,
            missing_skills: gap.missing,
        }
    }
}
