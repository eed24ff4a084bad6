//! Embedding model management for downloading and loading Model2Vec models

use crate::config::{AvailableModel, ModelConfig};
use crate::error::{Result, ScreenerError};
use crate::processing::embeddings::Model2VecEmbedder;
use hf_hub::api::tokio::Api;
use log::{info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Manager for embedding models - handles download, discovery and loading
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: Vec<AvailableModel>,
    downloaded_models: HashSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(config: &ModelConfig) -> Result<Self> {
        let models_dir = config.models_dir.clone();
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                ScreenerError::ModelLoading(format!("Failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            available_models: config.available_models.clone(),
            downloaded_models: HashSet::new(),
        };
        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            ScreenerError::ModelLoading(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && Self::is_model_directory(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    /// A Model2Vec directory needs a tokenizer and weights.
    async fn is_model_directory(path: &Path) -> bool {
        let has_weights = fs::metadata(path.join("model.safetensors")).await.is_ok();
        let has_tokenizer = fs::metadata(path.join("tokenizer.json")).await.is_ok();
        has_weights && has_tokenizer
    }

    /// Download an embedding model from Hugging Face Hub
    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let model_info = self
            .get_model_info(model_id)
            .cloned()
            .ok_or_else(|| {
                ScreenerError::ModelNotFound(format!("Unknown embedding model: {}", model_id))
            })?;

        let model_dir = self.models_dir.join(&model_info.name);
        if self.downloaded_models.contains(&model_info.name) {
            return Ok(model_dir);
        }

        println!(
            "📥 Downloading embedding model: {} ({} MB)",
            model_info.name, model_info.size_mb
        );
        println!("📍 Repository: {}", model_info.repo_id);

        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| ScreenerError::Network(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(model_info.repo_id.clone());

        for (file, required) in [
            ("model.safetensors", true),
            ("tokenizer.json", true),
            ("config.json", false),
        ] {
            match repo.get(file).await {
                Ok(cached_path) => {
                    fs::copy(&cached_path, model_dir.join(file)).await?;
                    println!("  ✅ Downloaded: {}", file);
                }
                Err(e) if required => {
                    return Err(ScreenerError::Network(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
                Err(e) => warn!("Optional file {} not found: {}", file, e),
            }
        }

        self.downloaded_models.insert(model_info.name.clone());
        println!("✅ Embedding model {} downloaded successfully!", model_info.name);
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        let id = self.resolve_model_id(model_id)?;
        self.downloaded_models
            .contains(&id)
            .then(|| self.models_dir.join(id))
    }

    /// Load a downloaded model. Never downloads.
    pub fn load_embedder(&self, model_id: &str) -> Result<Model2VecEmbedder> {
        let path = self.get_model_path(model_id).ok_or_else(|| {
            ScreenerError::ModelNotFound(format!(
                "Embedding model '{}' is not downloaded (run `models download {}`)",
                model_id, model_id
            ))
        })?;

        info!("Loading embedding model '{}'", model_id);
        Model2VecEmbedder::load(&path, model_id)
    }

    pub fn list_available_models(&self) -> &[AvailableModel] {
        &self.available_models
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        let mut models: Vec<String> = self.downloaded_models.iter().cloned().collect();
        models.sort();
        models
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&AvailableModel> {
        let id = self.resolve_model_id(model_id)?;
        self.available_models.iter().find(|m| m.name == id)
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.get_model_path(model_id).is_some()
    }

    /// Resolve a model name or Hugging Face repo id to a configured model name
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        let input_lower = input.to_lowercase();
        self.available_models
            .iter()
            .find(|m| m.name == input || m.repo_id == input)
            .or_else(|| {
                self.available_models
                    .iter()
                    .find(|m| m.name.to_lowercase() == input_lower)
            })
            .map(|m| m.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn model_config(dir: &Path) -> ModelConfig {
        let mut config = Config::default().models;
        config.models_dir = dir.join("models");
        config
    }

    #[tokio::test]
    async fn test_manager_creates_models_dir() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(&model_config(temp_dir.path())).await.unwrap();

        assert!(temp_dir.path().join("models").is_dir());
        assert_eq!(manager.list_available_models().len(), 3);
        assert!(manager.list_downloaded_models().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_model_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(&model_config(temp_dir.path())).await.unwrap();

        assert_eq!(manager.resolve_model_id("potion-base-8M"), Some("potion-base-8M".to_string()));
        assert_eq!(
            manager.resolve_model_id("minishlab/potion-base-8M"),
            Some("potion-base-8M".to_string())
        );
        assert_eq!(manager.resolve_model_id("POTION-BASE-8M"), Some("potion-base-8M".to_string()));
        assert_eq!(manager.resolve_model_id("gpt-5"), None);
    }

    #[tokio::test]
    async fn test_scan_detects_downloaded_model() {
        let temp_dir = TempDir::new().unwrap();
        let config = model_config(temp_dir.path());
        let model_dir = config.models_dir.join("m2v-base");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join("model.safetensors"), b"").unwrap();
        std::fs::write(model_dir.join("tokenizer.json"), b"{}").unwrap();
        std::fs::create_dir_all(config.models_dir.join("incomplete")).unwrap();

        let manager = EmbeddingModelManager::new(&config).await.unwrap();
        assert_eq!(manager.list_downloaded_models(), vec!["m2v-base".to_string()]);
        assert!(manager.is_model_downloaded("minishlab/M2V_base_output"));
        assert!(!manager.is_model_downloaded("potion-base-8M"));
    }

    #[tokio::test]
    async fn test_load_missing_model_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(&model_config(temp_dir.path())).await.unwrap();
        assert!(matches!(
            manager.load_embedder("potion-base-8M"),
            Err(ScreenerError::ModelNotFound(_))
        ));
    }
}
