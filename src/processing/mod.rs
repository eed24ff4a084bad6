//! Scoring, classification and evaluation

pub mod decision;
pub mod embedding_manager;
pub mod embeddings;
pub mod evaluator;
pub mod profile;
pub mod scorer;
pub mod screening;
pub mod similarity;
pub mod skills;

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
