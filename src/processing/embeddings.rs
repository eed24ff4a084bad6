//! Embedding capability: text to fixed-length vector, backed by Model2Vec

use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

/// Failures of the embedding capability. Every variant is recoverable: the
/// similarity provider answers them with keyword-overlap scoring.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Embedding model unavailable: {0}")]
    Unavailable(String),

    #[error("Embedding generation failed: {0}")]
    Failed(String),

    #[error("Embedding timed out after {0}ms")]
    Timeout(u64),
}

/// Anything that can turn text into a fixed-length vector.
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    /// Length of every vector returned by [`Embedder::embed`].
    fn dimensions(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Entries held by [`EmbeddingCache`] before it starts over.
const CACHE_CAPACITY: usize = 256;

/// Text-to-vector cache bounded to `capacity` entries. When full, it is
/// emptied before the next insert.
struct EmbeddingCache {
    capacity: usize,
    entries: HashMap<String, Vec<f32>>,
}

impl EmbeddingCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
        }
    }

    fn get(&self, text: &str) -> Option<Vec<f32>> {
        self.entries.get(text).cloned()
    }

    fn insert(&mut self, text: &str, embedding: Vec<f32>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            debug!("Embedding cache full ({} entries), clearing", self.entries.len());
            self.entries.clear();
        }
        self.entries.insert(text.to_string(), embedding);
    }
}

/// Model2Vec static embeddings with a bounded in-memory text cache.
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
    dimensions: usize,
    cache: Mutex<EmbeddingCache>,
}

impl Model2VecEmbedder {
    pub fn load(model_path: &Path, model_name: &str) -> crate::Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )?;

        // Probe once so the dimension contract is known up front
        let dimensions = model.encode_single("dimension check").len();
        if dimensions == 0 {
            return Err(crate::ScreenerError::ModelLoading(format!(
                "Model at {} produced empty embeddings",
                model_path.display()
            )));
        }

        info!(
            "Model loaded in {:.2?} ({} dimensions)",
            start_time.elapsed(),
            dimensions
        );

        Ok(Self {
            model,
            model_name: model_name.to_string(),
            dimensions,
            cache: Mutex::new(EmbeddingCache::new(CACHE_CAPACITY)),
        })
    }
}

impl Embedder for Model2VecEmbedder {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        {
            let cache = self
                .cache
                .lock()
                .map_err(|e| EmbeddingError::Failed(format!("Embedding cache poisoned: {}", e)))?;
            if let Some(cached) = cache.get(text) {
                return Ok(cached);
            }
        }

        let start_time = Instant::now();
        let embedding = self.model.encode_single(text);
        debug!(
            "Embedded {} chars in {}ms",
            text.len(),
            start_time.elapsed().as_millis()
        );

        let mut cache = self
            .cache
            .lock()
            .map_err(|e| EmbeddingError::Failed(format!("Embedding cache poisoned: {}", e)))?;
        cache.insert(text, embedding.clone());

        Ok(embedding)
    }
}

/// Cosine similarity of two equal-length vectors. Zero vectors give 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        assert_relative_eq!(
            cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]),
            1.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0, epsilon = 1e-9);
        assert_relative_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cache_stays_bounded() {
        let mut cache = EmbeddingCache::new(3);
        for i in 0..10 {
            cache.insert(&format!("resume {}", i), vec![i as f32]);
            assert!(cache.entries.len() <= 3);
        }
        assert_eq!(cache.get("resume 9"), Some(vec![9.0]));
        assert_eq!(cache.get("resume 0"), None);
    }

    #[test]
    fn test_zero_capacity_cache_stores_nothing() {
        let mut cache = EmbeddingCache::new(0);
        cache.insert("job", vec![1.0]);
        assert_eq!(cache.get("job"), None);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_is_scale_invariant() {
        let a = [0.3, 0.4, 0.5];
        let b = [3.0, 4.0, 5.0];
        assert_relative_eq!(cosine_similarity(&a, &b), 1.0, epsilon = 1e-6);
    }
}
