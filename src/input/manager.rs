//! Input manager for resume documents

use crate::error::{Result, ScreenerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::screening::ScreeningDocument;
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extracts document text, caching it per path.
pub struct InputManager {
    cache: HashMap<PathBuf, String>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if let Some(cached_text) = self.cache.get(path) {
            debug!("Using cached text for: {}", path.display());
            return Ok(cached_text.clone());
        }

        if !path.exists() {
            return Err(ScreenerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match self.detect_file_type(path)? {
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            other => {
                return Err(ScreenerError::UnsupportedFormat(format!(
                    "{:?} documents are not supported: {}",
                    other,
                    path.display()
                )));
            }
        };

        self.cache.insert(path.to_path_buf(), text.clone());

        Ok(text)
    }

    /// Extract every path, keeping per-file failures alongside the file name.
    pub async fn extract_documents(&mut self, paths: &[PathBuf]) -> Vec<ScreeningDocument> {
        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            let text = self.extract_text(path).await;
            documents.push((file_name, text));
        }
        documents
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ScreenerError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
