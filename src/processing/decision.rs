//! Threshold classification of final scores

use crate::config::ThresholdConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decision label attached to a scored candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Hire,
    Reject,
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "REVIEW")]
    Review,
    #[serde(rename = "FAIL")]
    Fail,
}

impl Decision {
    /// Whether the decision counts as a positive prediction in evaluation.
    pub fn is_positive(&self) -> bool {
        matches!(self, Decision::Hire | Decision::Pass)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Decision::Hire => "Hire",
            Decision::Reject => "Reject",
            Decision::Pass => "PASS",
            Decision::Review => "REVIEW",
            Decision::Fail => "FAIL",
        };
        write!(f, "{}", label)
    }
}

/// Which label set a score is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionPolicy {
    /// Hire / Reject, used for evaluation against recruiter decisions.
    Binary,
    /// PASS / REVIEW / FAIL, used for interactive screening.
    Ternary,
}

impl FromStr for DecisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" => Ok(DecisionPolicy::Binary),
            "ternary" => Ok(DecisionPolicy::Ternary),
            other => Err(format!(
                "Unknown decision policy '{}' (expected binary or ternary)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecisionClassifier {
    thresholds: ThresholdConfig,
}

impl DecisionClassifier {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Classify a score; every boundary is inclusive on the upper label.
    pub fn classify(&self, policy: DecisionPolicy, score: f64) -> Decision {
        match policy {
            DecisionPolicy::Binary => {
                if score >= self.thresholds.hire {
                    Decision::Hire
                } else {
                    Decision::Reject
                }
            }
            DecisionPolicy::Ternary => {
                if score >= self.thresholds.pass {
                    Decision::Pass
                } else if score >= self.thresholds.review {
                    Decision::Review
                } else {
                    Decision::Fail
                }
            }
        }
    }
}

impl Default for DecisionClassifier {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_boundaries() {
        let classifier = DecisionClassifier::default();
        assert_eq!(classifier.classify(DecisionPolicy::Binary, 55.0), Decision::Hire);
        assert_eq!(classifier.classify(DecisionPolicy::Binary, 54.99), Decision::Reject);
        assert_eq!(classifier.classify(DecisionPolicy::Binary, 100.0), Decision::Hire);
        assert_eq!(classifier.classify(DecisionPolicy::Binary, 0.0), Decision::Reject);
    }

    #[test]
    fn test_ternary_boundaries() {
        let classifier = DecisionClassifier::default();
        assert_eq!(classifier.classify(DecisionPolicy::Ternary, 80.0), Decision::Pass);
        assert_eq!(classifier.classify(DecisionPolicy::Ternary, 79.99), Decision::Review);
        assert_eq!(classifier.classify(DecisionPolicy::Ternary, 60.0), Decision::Review);
        assert_eq!(classifier.classify(DecisionPolicy::Ternary, 59.99), Decision::Fail);
    }

    #[test]
    fn test_labels_serialize_as_displayed() {
        assert_eq!(serde_json::to_string(&Decision::Pass).unwrap(), "\"PASS\"");
        assert_eq!(serde_json::to_string(&Decision::Hire).unwrap(), "\"Hire\"");
        assert_eq!(Decision::Review.to_string(), "REVIEW");
        assert!(Decision::Pass.is_positive());
        assert!(!Decision::Review.is_positive());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Binary".parse::<DecisionPolicy>().unwrap(), DecisionPolicy::Binary);
        assert!("quaternary".parse::<DecisionPolicy>().is_err());
    }
}
