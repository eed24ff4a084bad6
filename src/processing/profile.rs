//! Candidate and job description records, and the text templates built from them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;

/// Structured candidate attributes as loaded from a dataset row or form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub skills: String,
    /// Raw text; see [`CandidateProfile::experience_years`].
    pub experience: String,
    pub education: String,
    pub certifications: String,
    pub job_role: String,
}

impl CandidateProfile {
    /// Years of experience, or `None` when the raw value is not a
    /// non-negative integer. Digit strings too large for `u64` saturate.
    pub fn experience_years(&self) -> Option<u64> {
        match self.experience.trim().parse::<u64>() {
            Ok(years) => Some(years),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
            Err(_) => None,
        }
    }

    /// Resume text synthesized from the structured fields. Only ever used as
    /// similarity input.
    pub fn resume_text(&self) -> String {
        format!(
            "{}\nEducation: {}\nExperience: {} years\n\nSkills:\n{}\n\n\
             Certifications:\n{}\n\nLooking for: {} position",
            self.name,
            self.education,
            self.experience,
            self.skills,
            self.certifications,
            self.job_role
        )
        .trim()
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescription {
    pub title: String,
    pub description: String,
    pub required_skills: String,
}

impl JobDescription {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        required_skills: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            required_skills: required_skills.into(),
        }
    }

    /// Job description generated from the candidate's own role and skills,
    /// used when evaluating against recruiter decisions.
    pub fn for_candidate(candidate: &CandidateProfile) -> Self {
        let description = format!(
            "We are hiring for a {} position.\n\nRequired Skills: {}\n\
             Experience level: Mid to Senior level\nEducation: Bachelor's degree or equivalent\n\n\
             The ideal candidate will have strong technical skills \
             and proven experience in the field.",
            candidate.job_role, candidate.skills
        );

        Self {
            title: candidate.job_role.clone(),
            description: description.trim().to_string(),
            required_skills: candidate.skills.clone(),
        }
    }

    /// The text scored against resumes.
    pub fn text(&self) -> &str {
        &self.description
    }
}

/// Historical recruiter decision attached to a dataset row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroundTruth {
    Hire,
    Reject,
    Unknown(String),
}

impl GroundTruth {
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Hire" => GroundTruth::Hire,
            "Reject" => GroundTruth::Reject,
            other => GroundTruth::Unknown(other.to_string()),
        }
    }

    pub fn is_hire(&self) -> bool {
        matches!(self, GroundTruth::Hire)
    }
}

impl From<String> for GroundTruth {
    fn from(label: String) -> Self {
        GroundTruth::parse(&label)
    }
}

impl From<GroundTruth> for String {
    fn from(truth: GroundTruth) -> Self {
        truth.to_string()
    }
}

impl fmt::Display for GroundTruth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroundTruth::Hire => write!(f, "Hire"),
            GroundTruth::Reject => write!(f, "Reject"),
            GroundTruth::Unknown(label) if label.is_empty() => write!(f, "Unknown"),
            GroundTruth::Unknown(label) => write!(f, "{}", label),
        }
    }
}

/// Recruiter label counts of a dataset: the class balance an accuracy
/// figure has to be read against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDistribution {
    pub hire: u64,
    pub reject: u64,
    /// Labels other than Hire and Reject
    pub unknown: u64,
}

impl LabelDistribution {
    pub fn record(&mut self, label: &GroundTruth) {
        match label {
            GroundTruth::Hire => self.hire += 1,
            GroundTruth::Reject => self.reject += 1,
            GroundTruth::Unknown(_) => self.unknown += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.hire + self.reject + self.unknown
    }

    /// Hire share of the Hire and Reject labels, as a percentage.
    pub fn hire_percent(&self) -> f64 {
        self.share(self.hire)
    }

    /// Reject share of the Hire and Reject labels, as a percentage.
    pub fn reject_percent(&self) -> f64 {
        self.share(self.reject)
    }

    fn share(&self, count: u64) -> f64 {
        let labeled = self.hire + self.reject;
        if labeled == 0 {
            0.0
        } else {
            count as f64 / labeled as f64 * 100.0
        }
    }
}

impl<'a> FromIterator<&'a GroundTruth> for LabelDistribution {
    fn from_iter<I: IntoIterator<Item = &'a GroundTruth>>(iter: I) -> Self {
        let mut distribution = LabelDistribution::default();
        for label in iter {
            distribution.record(label);
        }
        distribution
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledCandidate {
    pub profile: CandidateProfile,
    pub ground_truth: GroundTruth,
}
