//! Input processing module
//! Handles file detection, resume text extraction and dataset loading

pub mod dataset;
pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use dataset::DatasetReader;
pub use manager::InputManager;
