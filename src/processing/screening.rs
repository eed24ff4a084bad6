//! Screening a batch of uploaded resumes against one job description

use crate::config::ScreeningConfig;
use crate::error::{Result, ScreenerError};
use crate::output::report::{ScreeningOutcome, ScreeningReport};
use crate::output::sink::PersistenceSink;
use crate::processing::decision::{DecisionClassifier, DecisionPolicy};
use crate::processing::similarity::SimilarityProvider;
use log::{info, warn};
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

const MAX_NAME_GRAPHEMES: usize = 100;

/// A document handed to the screener: its file name and extracted text, or
/// the reason extraction failed.
pub type ScreeningDocument = (String, Result<String>);

pub struct Screener {
    similarity: SimilarityProvider,
    classifier: DecisionClassifier,
    max_batch_size: usize,
    sink: Option<Arc<dyn PersistenceSink<ScreeningOutcome>>>,
}

impl Screener {
    pub fn new(
        similarity: SimilarityProvider,
        classifier: DecisionClassifier,
        config: &ScreeningConfig,
    ) -> Self {
        Self {
            similarity,
            classifier,
            max_batch_size: config.max_batch_size,
            sink: None,
        }
    }

    /// Persist every successfully screened resume through `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn PersistenceSink<ScreeningOutcome>>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Screen `documents` against `job_text`.
    ///
    /// Empty or oversized batches are rejected before anything is scored.
    /// A document that failed extraction or has no text becomes an error
    /// outcome; the rest of the batch is still screened.
    pub fn screen(
        &self,
        job_id: u64,
        job_text: &str,
        documents: Vec<ScreeningDocument>,
    ) -> Result<ScreeningReport> {
        if documents.is_empty() {
            return Err(ScreenerError::InvalidInput("No resumes provided".to_string()));
        }
        if documents.len() > self.max_batch_size {
            return Err(ScreenerError::BatchTooLarge {
                count: documents.len(),
                max: self.max_batch_size,
            });
        }
        if job_text.trim().is_empty() {
            return Err(ScreenerError::InvalidInput("Job description is empty".to_string()));
        }

        info!("Screening {} resume(s) against job {}", documents.len(), job_id);

        let results = documents
            .into_iter()
            .map(|(file_name, text)| {
                let mut outcome = match text {
                    Ok(text) if text.trim().is_empty() => {
                        warn!("No text extracted from {}", file_name);
                        let error = ScreenerError::EmptyDocument(file_name.clone());
                        ScreeningOutcome::failed(file_name, error.to_string())
                    }
                    Ok(text) => match self.screen_text(&file_name, &text, job_text) {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            warn!("Failed to screen {}: {}", file_name, e);
                            ScreeningOutcome::failed(file_name, e.to_string())
                        }
                    },
                    Err(e) => {
                        warn!("Skipped {}: {}", file_name, e);
                        ScreeningOutcome::failed(file_name, e.to_string())
                    }
                };

                if !outcome.is_error() {
                    outcome.id = self.persist(job_id, &outcome);
                }
                outcome
            })
            .collect();

        Ok(ScreeningReport::new(job_id, job_text, results))
    }

    fn screen_text(
        &self,
        file_name: &str,
        resume_text: &str,
        job_text: &str,
    ) -> Result<ScreeningOutcome> {
        let similarity = self.similarity.similarity(resume_text, job_text)?;
        let gap = self.similarity.matcher().gap(resume_text, job_text);
        let recommendation = self.classifier.classify(DecisionPolicy::Ternary, similarity.score);

        info!("{}: {:.2}% - {}", file_name, similarity.score, recommendation);

        Ok(ScreeningOutcome {
            id: None,
            file_name: file_name.to_string(),
            candidate_name: candidate_name(resume_text),
            match_score: similarity.score,
            matched_skills: gap.matched,
            missing_skills: gap.missing,
            recommendation: Some(recommendation),
            scoring_mode: Some(similarity.mode),
            error: None,
        })
    }

    fn persist(&self, job_id: u64, outcome: &ScreeningOutcome) -> Option<String> {
        let sink = self.sink.as_ref()?;
        match sink.persist(job_id, outcome) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Could not save result for {}: {}", outcome.file_name, e);
                None
            }
        }
    }
}

/// First non-blank line of the resume, cut to 100 characters.
pub fn candidate_name(resume_text: &str) -> String {
    resume_text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| {
            line.graphemes(true)
                .take(MAX_NAME_GRAPHEMES)
                .collect::<String>()
                .trim()
                .to_string()
        })
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::decision::Decision;
    use crate::processing::similarity::ScoringMode;
    use crate::processing::skills::SkillMatcher;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        saved: Mutex<Vec<String>>,
    }

    impl PersistenceSink<ScreeningOutcome> for RecordingSink {
        fn persist(&self, job_id: u64, record: &ScreeningOutcome) -> Result<String> {
            let mut saved = self.saved.lock().unwrap();
            saved.push(record.file_name.clone());
            Ok(format!("{}-{}", job_id, saved.len()))
        }
    }

    fn screener(max_batch_size: usize) -> Screener {
        let matcher = SkillMatcher::with_default_vocabulary().unwrap();
        let config = ScreeningConfig {
            max_batch_size,
            history_file: "unused.jsonl".into(),
        };
        Screener::new(
            SimilarityProvider::keyword_only(matcher),
            DecisionClassifier::default(),
            &config,
        )
    }

    fn doc(name: &str, text: &str) -> ScreeningDocument {
        (name.to_string(), Ok(text.to_string()))
    }

    #[test]
    fn test_batch_limits() {
        let s = screener(2);
        assert!(matches!(
            s.screen(1, "Python", Vec::new()),
            Err(ScreenerError::InvalidInput(_))
        ));

        let docs = vec![doc("a", "x"), doc("b", "y"), doc("c", "z")];
        assert!(matches!(
            s.screen(1, "Python", docs),
            Err(ScreenerError::BatchTooLarge { count: 3, max: 2 })
        ));
    }

    #[test]
    fn test_failed_documents_do_not_stop_batch() {
        let s = screener(10);
        let docs = vec![
            doc("blank.txt", "   \n  "),
            ("scan.pdf".to_string(), Err(ScreenerError::UnsupportedFormat("pdf".to_string()))),
            doc("jane.txt", "Jane Doe\nPython, SQL and Docker"),
        ];
        let report = s.screen(1, "Needs Python, SQL, Docker, AWS", docs).unwrap();

        assert_eq!(report.total_processed, 3);
        assert_eq!(report.error_count(), 2);
        assert!(report.results[1].error.as_deref().unwrap().contains("pdf"));

        let jane = &report.results[2];
        assert_eq!(jane.candidate_name, "Jane Doe");
        assert_eq!(jane.match_score, 75.0);
        assert_eq!(jane.recommendation, Some(Decision::Review));
        assert_eq!(jane.scoring_mode, Some(ScoringMode::Fallback));
        assert_eq!(jane.missing_skills, vec!["aws"]);
    }

    #[test]
    fn test_only_successful_outcomes_are_persisted() {
        let sink = Arc::new(RecordingSink::default());
        let s = screener(10).with_sink(sink.clone());
        let docs = vec![doc("empty.txt", ""), doc("cv.txt", "Sam\nPython")];
        let report = s.screen(7, "Python", docs).unwrap();

        assert_eq!(*sink.saved.lock().unwrap(), vec!["cv.txt".to_string()]);
        assert_eq!(report.results[1].id.as_deref(), Some("7-1"));
        assert!(report.results[0].id.is_none());
        assert_eq!(report.results[1].recommendation, Some(Decision::Pass));
    }

    #[test]
    fn test_candidate_name() {
        assert_eq!(candidate_name("\n\n  Ada Lovelace  \nEngineer"), "Ada Lovelace");
        assert_eq!(candidate_name(""), "Unknown");
        assert_eq!(candidate_name(&"é".repeat(150)).chars().count(), 100);
    }
}
