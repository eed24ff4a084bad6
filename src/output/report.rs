//! Report structures for evaluation runs and screening batches

use crate::processing::decision::Decision;
use crate::processing::evaluator::{ConfusionTally, EvaluationSummary};
use crate::processing::profile::{GroundTruth, LabelDistribution};
use crate::processing::scorer::MatchResult;
use crate::processing::similarity::ScoringMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one dataset record in an evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// Position of the record in the input dataset
    pub index: usize,

    pub result: MatchResult,

    /// Recruiter decision the prediction is compared against
    pub ground_truth: GroundTruth,

    /// Raw experience text as it appeared in the dataset
    pub experience: String,

    pub education: String,

    pub correct: bool,

    /// Error text when the semantic path failed and the record was re-scored
    /// with keyword overlap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_error: Option<String>,
}

impl RecordOutcome {
    pub fn predicted_hire(&self) -> bool {
        self.result.decision.is_positive()
    }

    pub fn is_degraded(&self) -> bool {
        self.scoring_error.is_some()
    }
}

/// Records scored per mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringModeCounts {
    pub semantic: u64,
    pub fallback: u64,
}

impl ScoringModeCounts {
    pub fn record(&mut self, mode: ScoringMode) {
        match mode {
            ScoringMode::Semantic => self.semantic += 1,
            ScoringMode::Fallback => self.fallback += 1,
        }
    }
}

/// Finished evaluation run against recruiter decisions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub summary: EvaluationSummary,

    pub confusion_matrix: ConfusionTally,

    /// Per-record outcomes in input order
    pub detailed_results: Vec<RecordOutcome>,

    /// Records whose semantic scoring failed and were re-scored
    pub degraded_records: u64,

    pub scoring_mode_counts: ScoringModeCounts,

    /// Recruiter labels of the evaluated records
    #[serde(default)]
    pub label_distribution: LabelDistribution,

    /// Embedding model used, if any
    #[serde(default)]
    pub model: Option<String>,

    pub generated_at: DateTime<Utc>,
}

impl EvaluationReport {
    pub fn new(
        confusion_matrix: ConfusionTally,
        detailed_results: Vec<RecordOutcome>,
        model: Option<String>,
    ) -> Self {
        let mut scoring_mode_counts = ScoringModeCounts::default();
        for outcome in &detailed_results {
            scoring_mode_counts.record(outcome.result.breakdown.scoring_mode);
        }
        let degraded_records = detailed_results.iter().filter(|r| r.is_degraded()).count() as u64;
        let label_distribution = detailed_results.iter().map(|r| &r.ground_truth).collect();

        Self {
            summary: confusion_matrix.summary(),
            confusion_matrix,
            detailed_results,
            degraded_records,
            scoring_mode_counts,
            label_distribution,
            model,
            generated_at: Utc::now(),
        }
    }

    /// True when every record was scored semantically.
    pub fn fully_semantic(&self) -> bool {
        self.scoring_mode_counts.fallback == 0 && !self.detailed_results.is_empty()
    }
}

/// Outcome of screening one uploaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    /// Identifier assigned by the persistence sink
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub file_name: String,

    pub candidate_name: String,

    pub match_score: f64,

    pub matched_skills: Vec<String>,

    pub missing_skills: Vec<String>,

    /// `None` when the document could not be screened
    pub recommendation: Option<Decision>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_mode: Option<ScoringMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScreeningOutcome {
    pub fn failed(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: None,
            file_name: file_name.into(),
            candidate_name: "Error".to_string(),
            match_score: 0.0,
            matched_skills: Vec::new(),
            missing_skills: Vec::new(),
            recommendation: None,
            scoring_mode: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.recommendation.is_none()
    }

    /// Recommendation label, `ERROR` for failed documents.
    pub fn recommendation_label(&self) -> String {
        self.recommendation
            .map(|d| d.to_string())
            .unwrap_or_else(|| "ERROR".to_string())
    }

    pub fn ai_powered(&self) -> bool {
        self.scoring_mode == Some(ScoringMode::Semantic)
    }
}

/// Results of one screening batch against a single job description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub job_id: u64,
    pub job_description: String,
    pub total_processed: usize,
    pub results: Vec<ScreeningOutcome>,
    pub screened_at: DateTime<Utc>,
}

impl ScreeningReport {
    pub fn new(
        job_id: u64,
        job_description: impl Into<String>,
        results: Vec<ScreeningOutcome>,
    ) -> Self {
        Self {
            job_id,
            job_description: job_description.into(),
            total_processed: results.len(),
            results,
            screened_at: Utc::now(),
        }
    }

    pub fn successful(&self) -> impl Iterator<Item = &ScreeningOutcome> {
        self.results.iter().filter(|r| !r.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_error()).count()
    }

    /// Successful outcomes ordered by descending match score.
    pub fn ranked(&self) -> Vec<&ScreeningOutcome> {
        let mut ranked: Vec<&ScreeningOutcome> = self.successful().collect();
        ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, score: f64) -> ScreeningOutcome {
        ScreeningOutcome {
            id: None,
            file_name: format!("{}.txt", name),
            candidate_name: name.to_string(),
            match_score: score,
            matched_skills: vec!["python".to_string()],
            missing_skills: Vec::new(),
            recommendation: Some(Decision::Review),
            scoring_mode: Some(ScoringMode::Fallback),
            error: None,
        }
    }

    #[test]
    fn test_screening_report_ranking() {
        let report = ScreeningReport::new(
            1,
            "Python developer",
            vec![
                outcome("low", 40.0),
                ScreeningOutcome::failed("broken.pdf", "Unsupported file format: pdf"),
                outcome("high", 90.0),
            ],
        );

        assert_eq!(report.total_processed, 3);
        assert_eq!(report.error_count(), 1);
        let ranked: Vec<&str> = report.ranked().iter().map(|o| o.candidate_name.as_str()).collect();
        assert_eq!(ranked, vec!["high", "low"]);
    }

    #[test]
    fn test_failed_outcome_shape() {
        let failed = ScreeningOutcome::failed("cv.txt", "empty");
        assert!(failed.is_error());
        assert_eq!(failed.recommendation_label(), "ERROR");
        assert_eq!(failed.candidate_name, "Error");
        assert_eq!(failed.match_score, 0.0);
        assert!(!failed.ai_powered());

        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["recommendation"], serde_json::Value::Null);
        assert_eq!(json["error"], "empty");
    }
}
