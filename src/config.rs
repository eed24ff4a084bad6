//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use crate::processing::skills::{MatchStrategy, DEFAULT_VOCABULARY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub scoring: ScoringConfig,
    pub thresholds: ThresholdConfig,
    pub skills: SkillsConfig,
    pub evaluation: EvaluationConfig,
    pub screening: ScreeningConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
    pub available_models: Vec<AvailableModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableModel {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: usize,
    pub description: String,
}

/// Weights and bonus tiers of the composite score.
///
/// With the defaults the score is `semantic * 0.60 + experience + education`
/// where the bonuses top out at 25 and 15, so the maximum is exactly 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub semantic_weight: f64,
    pub experience_default_bonus: f64,
    pub education_default_bonus: f64,
    /// The reached tier with the largest `min_years` wins; order does not matter.
    pub experience_tiers: Vec<ExperienceTier>,
    /// Checked in order; the first tier with a matching term wins.
    pub education_tiers: Vec<EducationTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceTier {
    pub min_years: u32,
    pub bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationTier {
    pub label: String,
    pub bonus: f64,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Binary policy: scores at or above this are Hire.
    pub hire: f64,
    /// Ternary policy: scores at or above this are PASS.
    pub pass: f64,
    /// Ternary policy: scores at or above this (and below `pass`) are REVIEW.
    pub review: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    pub strategy: MatchStrategy,
    pub vocabulary: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub parallel: bool,
    /// Worker threads for parallel evaluation; 0 lets rayon decide.
    pub workers: usize,
    pub show_progress: bool,
    /// Log the running accuracy every N records (0 disables).
    pub log_every: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    pub max_batch_size: usize,
    pub history_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-screener");

        Self {
            models: ModelConfig {
                models_dir: data_dir.join("models"),
                default_embedding_model: "potion-base-8M".to_string(),
                available_models: vec![
                    AvailableModel {
                        name: "potion-base-8M".to_string(),
                        repo_id: "minishlab/potion-base-8M".to_string(),
                        size_mb: 33,
                        dimensions: 256,
                        description: "Compact Model2Vec embeddings, good default for screening"
                            .to_string(),
                    },
                    AvailableModel {
                        name: "m2v-base".to_string(),
                        repo_id: "minishlab/M2V_base_output".to_string(),
                        size_mb: 90,
                        dimensions: 256,
                        description: "Model2Vec base embeddings model".to_string(),
                    },
                    AvailableModel {
                        name: "m2v-large".to_string(),
                        repo_id: "minishlab/M2V_large_output".to_string(),
                        size_mb: 250,
                        dimensions: 512,
                        description: "Higher capacity Model2Vec embeddings model".to_string(),
                    },
                ],
            },
            scoring: ScoringConfig::default(),
            thresholds: ThresholdConfig::default(),
            skills: SkillsConfig {
                strategy: MatchStrategy::Substring,
                vocabulary: DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect(),
            },
            evaluation: EvaluationConfig {
                parallel: false,
                workers: 0,
                show_progress: true,
                log_every: 100,
            },
            screening: ScreeningConfig {
                max_batch_size: 10,
                history_file: data_dir.join("screenings.jsonl"),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let tier = |min_years, bonus| ExperienceTier { min_years, bonus };
        let edu = |label: &str, bonus, terms: &[&str]| EducationTier {
            label: label.to_string(),
            bonus,
            terms: terms.iter().map(|t| t.to_string()).collect(),
        };

        Self {
            semantic_weight: 0.60,
            experience_default_bonus: 5.0,
            education_default_bonus: 5.0,
            experience_tiers: vec![
                tier(10, 25.0),
                tier(7, 20.0),
                tier(5, 15.0),
                tier(3, 10.0),
            ],
            education_tiers: vec![
                edu("doctoral", 15.0, &["phd", "ph.d"]),
                edu("master", 12.0, &["master", "m.sc", "m.tech", "mba"]),
                edu("bachelor", 10.0, &["bachelor", "b.sc", "b.tech"]),
            ],
        }
    }
}

impl ScoringConfig {
    /// Highest score this configuration can produce for a semantic component of 100.
    pub fn max_theoretical_score(&self) -> f64 {
        let max_exp = self
            .experience_tiers
            .iter()
            .map(|t| t.bonus)
            .fold(self.experience_default_bonus, f64::max);
        let max_edu = self
            .education_tiers
            .iter()
            .map(|t| t.bonus)
            .fold(self.education_default_bonus, f64::max);
        100.0 * self.semantic_weight + max_exp + max_edu
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.semantic_weight.is_finite() && self.semantic_weight >= 0.0) {
            return Err(ScreenerError::Configuration(format!(
                "scoring.semantic_weight must be a non-negative number, got {}",
                self.semantic_weight
            )));
        }

        let bonuses = self
            .experience_tiers
            .iter()
            .map(|t| t.bonus)
            .chain(self.education_tiers.iter().map(|t| t.bonus))
            .chain([self.experience_default_bonus, self.education_default_bonus]);
        for bonus in bonuses {
            if !(bonus.is_finite() && bonus >= 0.0) {
                return Err(ScreenerError::Configuration(format!(
                    "scoring bonuses must be non-negative numbers, got {}",
                    bonus
                )));
            }
        }

        let max = self.max_theoretical_score();
        if max > 100.0 + f64::EPSILON * 100.0 {
            return Err(ScreenerError::Configuration(format!(
                "scoring configuration can reach {:.2}, above the 100 point scale",
                max
            )));
        }

        Ok(())
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            hire: 55.0,
            pass: 80.0,
            review: 60.0,
        }
    }
}

impl ThresholdConfig {
    pub fn validate(&self) -> Result<()> {
        if self.review > self.pass {
            return Err(ScreenerError::Configuration(format!(
                "thresholds.review ({}) must not exceed thresholds.pass ({})",
                self.review, self.pass
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load from an explicit path, or from the default location. A missing
    /// default file is created with default values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)
                .map_err(|e| {
                    ScreenerError::Configuration(format!("Failed to parse config: {}", e))
                })?
        } else if path.is_some() {
            return Err(ScreenerError::Configuration(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| {
                ScreenerError::Configuration(format!("Failed to serialize config: {}", e))
            })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        self.thresholds.validate()?;
        if self.skills.vocabulary.is_empty() {
            return Err(ScreenerError::Configuration(
                "skills.vocabulary must contain at least one token".to_string(),
            ));
        }
        if self.screening.max_batch_size == 0 {
            return Err(ScreenerError::Configuration(
                "screening.max_batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
