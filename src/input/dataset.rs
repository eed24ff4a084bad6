//! Labeled candidate datasets in the recruiter-decision CSV layout

use crate::error::{Result, ScreenerError};
use crate::processing::profile::{
    CandidateProfile, GroundTruth, LabelDistribution, LabeledCandidate,
};
use log::{info, warn};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One CSV row. Missing columns fall back to empty text, experience to
/// "0" and the decision to "Unknown".
#[derive(Debug, Deserialize)]
struct DatasetRow {
    #[serde(rename = "Name", default)]
    name: String,

    #[serde(rename = "Skills", default)]
    skills: String,

    #[serde(rename = "Experience (Years)", default = "default_experience")]
    experience: String,

    #[serde(rename = "Education", default)]
    education: String,

    #[serde(rename = "Certifications", default)]
    certifications: String,

    #[serde(rename = "Job Role", default)]
    job_role: String,

    #[serde(rename = "Recruiter Decision", default = "default_decision")]
    decision: String,
}

fn default_experience() -> String {
    "0".to_string()
}

fn default_decision() -> String {
    "Unknown".to_string()
}

impl From<DatasetRow> for LabeledCandidate {
    fn from(row: DatasetRow) -> Self {
        LabeledCandidate {
            ground_truth: GroundTruth::parse(&row.decision),
            profile: CandidateProfile {
                name: row.name,
                skills: row.skills,
                experience: row.experience,
                education: row.education,
                certifications: row.certifications,
                job_role: row.job_role,
            },
        }
    }
}

pub struct DatasetReader {
    limit: Option<usize>,
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetReader {
    pub fn new() -> Self {
        Self { limit: None }
    }

    /// Stop after `limit` records.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn read_path(&self, path: &Path) -> Result<Vec<LabeledCandidate>> {
        if !path.exists() {
            return Err(ScreenerError::InvalidInput(format!(
                "Dataset does not exist: {}",
                path.display()
            )));
        }

        info!("Loading dataset from {}", path.display());
        let file = std::fs::File::open(path)?;
        self.read(file)
    }

    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<LabeledCandidate>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.deserialize::<DatasetRow>() {
            if self.limit.is_some_and(|limit| records.len() >= limit) {
                break;
            }
            records.push(LabeledCandidate::from(row?));
        }

        let labels: LabelDistribution = records.iter().map(|r| &r.ground_truth).collect();
        info!(
            "Loaded {} records: {} Hire ({:.1}%), {} Reject ({:.1}%)",
            records.len(),
            labels.hire,
            labels.hire_percent(),
            labels.reject,
            labels.reject_percent()
        );
        if labels.unknown > 0 {
            warn!(
                "{} of {} records have an unrecognized recruiter decision and count as not hired",
                labels.unknown,
                records.len()
            );
        }

        Ok(records)
    }
}
