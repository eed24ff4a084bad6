//! Batch evaluation of scoring decisions against recruiter ground truth

use crate::config::EvaluationConfig;
use crate::output::report::{EvaluationReport, RecordOutcome};
use crate::processing::decision::DecisionPolicy;
use crate::processing::profile::{JobDescription, LabeledCandidate};
use crate::processing::scorer::CompositeScorer;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::time::Instant;

/// Four-way outcome counts of a binary classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionTally {
    pub true_positives: u64,
    pub true_negatives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
}

impl ConfusionTally {
    /// Count one prediction. Returns whether it was correct.
    pub fn record(&mut self, predicted: bool, actual: bool) -> bool {
        match (predicted, actual) {
            (true, true) => self.true_positives += 1,
            (false, false) => self.true_negatives += 1,
            (true, false) => self.false_positives += 1,
            (false, true) => self.false_negatives += 1,
        }
        predicted == actual
    }

    pub fn total(&self) -> u64 {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    pub fn correct(&self) -> u64 {
        self.true_positives + self.true_negatives
    }

    pub fn summary(&self) -> EvaluationSummary {
        let total = self.total();
        let correct = self.correct();
        let tp = self.true_positives as f64;

        let accuracy = ratio_percent(correct as f64, total as f64);
        let precision = ratio_percent(tp, (self.true_positives + self.false_positives) as f64);
        let recall = ratio_percent(tp, (self.true_positives + self.false_negatives) as f64);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        EvaluationSummary {
            total_cases: total,
            correct_predictions: correct,
            accuracy,
            precision,
            recall,
            f1_score,
        }
    }
}

fn ratio_percent(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

impl Add for ConfusionTally {
    type Output = ConfusionTally;

    fn add(mut self, rhs: ConfusionTally) -> ConfusionTally {
        self += rhs;
        self
    }
}

impl AddAssign for ConfusionTally {
    fn add_assign(&mut self, rhs: ConfusionTally) {
        self.true_positives += rhs.true_positives;
        self.true_negatives += rhs.true_negatives;
        self.false_positives += rhs.false_positives;
        self.false_negatives += rhs.false_negatives;
    }
}

impl Sum for ConfusionTally {
    fn sum<I: Iterator<Item = ConfusionTally>>(iter: I) -> Self {
        iter.fold(ConfusionTally::default(), Add::add)
    }
}

/// Derived metrics, all on a 0-100 scale. Zero denominators give 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub total_cases: u64,
    pub correct_predictions: u64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

#[derive(Debug, Clone)]
pub struct EvaluationOptions {
    pub parallel: bool,
    /// Worker threads for parallel runs; 0 lets rayon decide.
    pub workers: usize,
    pub show_progress: bool,
    /// Log running accuracy every this many records; 0 disables.
    pub log_every: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            workers: 0,
            show_progress: false,
            log_every: 100,
        }
    }
}

impl From<&EvaluationConfig> for EvaluationOptions {
    fn from(config: &EvaluationConfig) -> Self {
        Self {
            parallel: config.parallel,
            workers: config.workers,
            show_progress: config.show_progress,
            log_every: config.log_every,
        }
    }
}

pub struct BatchEvaluator {
    scorer: CompositeScorer,
    options: EvaluationOptions,
}

impl BatchEvaluator {
    pub fn new(scorer: CompositeScorer, options: EvaluationOptions) -> Self {
        Self { scorer, options }
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Score every record against a job synthesized from its own role and
    /// skills, and tally binary decisions against the recruiter label.
    pub fn evaluate(&self, records: &[LabeledCandidate]) -> EvaluationReport {
        let start_time = Instant::now();
        info!(
            "Evaluating {} records ({} mode)",
            records.len(),
            if self.options.parallel { "parallel" } else { "sequential" }
        );

        let progress = self.progress_bar(records.len() as u64);

        let (outcomes, tally) = if self.options.parallel {
            match self.build_pool() {
                Ok(pool) => pool.install(|| self.evaluate_parallel(records, &progress)),
                Err(e) => {
                    warn!("Could not build worker pool, evaluating sequentially: {}", e);
                    self.evaluate_sequential(records, &progress)
                }
            }
        } else {
            self.evaluate_sequential(records, &progress)
        };

        progress.finish_and_clear();

        let model = self
            .scorer
            .similarity_provider()
            .embedder_name()
            .map(str::to_string);
        let report = EvaluationReport::new(tally, outcomes, model);

        info!(
            "Evaluation complete in {:.2?}: accuracy {:.2}%, {} degraded",
            start_time.elapsed(),
            report.summary.accuracy,
            report.degraded_records
        );

        report
    }

    fn evaluate_sequential(
        &self,
        records: &[LabeledCandidate],
        progress: &ProgressBar,
    ) -> (Vec<RecordOutcome>, ConfusionTally) {
        let mut tally = ConfusionTally::default();
        let mut outcomes = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let outcome = self.evaluate_record(index, record);
            tally.record(outcome.predicted_hire(), outcome.ground_truth.is_hire());
            outcomes.push(outcome);
            progress.inc(1);

            let processed = index + 1;
            if self.options.log_every > 0 && processed % self.options.log_every == 0 {
                info!(
                    "Processed {}/{} records (accuracy {:.1}%)",
                    processed,
                    records.len(),
                    tally.summary().accuracy
                );
            }
        }

        (outcomes, tally)
    }

    fn evaluate_parallel(
        &self,
        records: &[LabeledCandidate],
        progress: &ProgressBar,
    ) -> (Vec<RecordOutcome>, ConfusionTally) {
        // Indexed collect keeps input order regardless of completion order
        let outcomes: Vec<RecordOutcome> = records
            .par_iter()
            .enumerate()
            .map(|(index, record)| {
                let outcome = self.evaluate_record(index, record);
                progress.inc(1);
                outcome
            })
            .collect();

        let tally = outcomes
            .par_iter()
            .fold(ConfusionTally::default, |mut partial, outcome| {
                partial.record(outcome.predicted_hire(), outcome.ground_truth.is_hire());
                partial
            })
            .reduce(ConfusionTally::default, Add::add);

        (outcomes, tally)
    }

    /// Score one record. A scoring error degrades that record to keyword
    /// overlap and never reaches the rest of the batch.
    fn evaluate_record(&self, index: usize, record: &LabeledCandidate) -> RecordOutcome {
        let profile = &record.profile;
        let job = JobDescription::for_candidate(profile);

        let (result, scoring_error) = match self
            .scorer
            .match_candidate(profile, &job, DecisionPolicy::Binary)
        {
            Ok(result) => (result, None),
            Err(e) => {
                warn!(
                    "Record {} ('{}') re-scored with keyword overlap: {}",
                    index, profile.name, e
                );
                let result = self
                    .scorer
                    .match_candidate_fallback(profile, &job, DecisionPolicy::Binary);
                (result, Some(e.to_string()))
            }
        };

        let correct = result.decision.is_positive() == record.ground_truth.is_hire();

        RecordOutcome {
            index,
            result,
            ground_truth: record.ground_truth.clone(),
            experience: profile.experience.clone(),
            education: profile.education.clone(),
            correct,
            scoring_error,
        }
    }

    fn build_pool(&self) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.workers)
            .thread_name(|i| format!("evaluator-{}", i))
            .build()
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records ({eta})",
        )
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

        let bar = ProgressBar::new(len);
        bar.set_style(style);
        bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::processing::decision::DecisionClassifier;
    use crate::processing::profile::{CandidateProfile, GroundTruth};
    use crate::processing::similarity::SimilarityProvider;
    use crate::processing::skills::SkillMatcher;
    use proptest::prelude::*;

    fn keyword_evaluator(options: EvaluationOptions) -> BatchEvaluator {
        let matcher = SkillMatcher::with_default_vocabulary().unwrap();
        let scorer = CompositeScorer::new(
            SimilarityProvider::keyword_only(matcher),
            ScoringConfig::default(),
            DecisionClassifier::default(),
        );
        BatchEvaluator::new(scorer, options)
    }

    fn record(name: &str, experience: &str, education: &str, label: &str) -> LabeledCandidate {
        LabeledCandidate {
            profile: CandidateProfile {
                name: name.to_string(),
                skills: "Python, SQL".to_string(),
                experience: experience.to_string(),
                education: education.to_string(),
                certifications: String::new(),
                job_role: "Analyst".to_string(),
            },
            ground_truth: GroundTruth::parse(label),
        }
    }

    #[test]
    fn test_zero_denominators() {
        let summary = ConfusionTally::default().summary();
        assert_eq!(summary.total_cases, 0);
        assert_eq!(summary.accuracy, 0.0);
        assert_eq!(summary.precision, 0.0);
        assert_eq!(summary.recall, 0.0);
        assert_eq!(summary.f1_score, 0.0);

        let only_negatives = ConfusionTally {
            true_negatives: 3,
            ..Default::default()
        };
        let summary = only_negatives.summary();
        assert_eq!(summary.accuracy, 100.0);
        assert_eq!(summary.precision, 0.0);
        assert_eq!(summary.recall, 0.0);
        assert_eq!(summary.f1_score, 0.0);
    }

    #[test]
    fn test_metrics() {
        let tally = ConfusionTally {
            true_positives: 6,
            true_negatives: 2,
            false_positives: 2,
            false_negatives: 0,
        };
        let summary = tally.summary();
        assert_eq!(summary.accuracy, 80.0);
        assert_eq!(summary.precision, 75.0);
        assert_eq!(summary.recall, 100.0);
        assert!((summary.f1_score - 85.714285).abs() < 1e-4);
    }

    #[test]
    fn test_keyword_only_evaluation() {
        // Every skill of the synthesized job is on the resume, so the
        // semantic component is 100 and the score is 60 plus bonuses.
        let records = vec![
            record("a", "10", "PhD", "Hire"),
            record("b", "0", "", "Reject"),
            record("c", "x", "", "Maybe"),
        ];
        let report = keyword_evaluator(EvaluationOptions::default()).evaluate(&records);

        assert_eq!(report.detailed_results.len(), 3);
        assert_eq!(report.detailed_results[0].result.final_score(), 100.0);
        assert_eq!(report.detailed_results[1].result.final_score(), 70.0);
        assert_eq!(report.confusion_matrix.true_positives, 1);
        assert_eq!(report.confusion_matrix.false_positives, 2);
        assert_eq!(report.summary.total_cases, 3);
        assert_eq!(report.scoring_mode_counts.fallback, 3);
        assert_eq!(report.degraded_records, 0);
        assert!(report.model.is_none());
    }

    #[test]
    fn test_empty_dataset() {
        let report = keyword_evaluator(EvaluationOptions::default()).evaluate(&[]);
        assert!(report.detailed_results.is_empty());
        assert_eq!(report.summary.accuracy, 0.0);
    }

    proptest! {
        #[test]
        fn prop_split_and_merge_matches_whole(
            outcomes in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..200),
            split in 0usize..200,
        ) {
            let split = split.min(outcomes.len());
            let tally_of = |items: &[(bool, bool)]| {
                let mut tally = ConfusionTally::default();
                for (predicted, actual) in items {
                    tally.record(*predicted, *actual);
                }
                tally
            };

            let whole = tally_of(&outcomes);
            let left = tally_of(&outcomes[..split]);
            let right = tally_of(&outcomes[split..]);

            prop_assert_eq!(left + right, whole);
            prop_assert_eq!(right + left, whole);
            prop_assert_eq!(whole.total(), outcomes.len() as u64);
        }

        #[test]
        fn prop_merge_is_associative(
            a in (0u64..50, 0u64..50, 0u64..50, 0u64..50),
            b in (0u64..50, 0u64..50, 0u64..50, 0u64..50),
            c in (0u64..50, 0u64..50, 0u64..50, 0u64..50),
        ) {
            let t = |(tp, tn, fp, fn_)| ConfusionTally {
                true_positives: tp,
                true_negatives: tn,
                false_positives: fp,
                false_negatives: fn_,
            };
            let (a, b, c) = (t(a), t(b), t(c));
            prop_assert_eq!((a + b) + c, a + (b + c));
            prop_assert_eq!([a, b, c].into_iter().sum::<ConfusionTally>(), a + b + c);
        }
    }
}
