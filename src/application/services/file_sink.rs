use std::path::PathBuf;

use async_trait::async_trait;

use crate::application::error::ApplicationError;

/// Local destination for downloaded content.
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Saves the content under `filename`. On failure nothing is left behind.
    async fn save(&self, filename: &str, content: &[u8]) -> Result<PathBuf, ApplicationError>;
}
