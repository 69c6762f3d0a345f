use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::{error::ApplicationError, services::FileSink};

const FALLBACK_FILENAME: &str = "download";

/// Writes downloads into a local directory. Content goes to a temporary file
/// first and is renamed into place, so a failed save leaves nothing behind.
pub struct DirectoryFileSink {
    dir: PathBuf,
}

impl DirectoryFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Keeps the requested name as given, minus any directory part, control
/// characters and leading dots, so the file never escapes the target directory.
pub fn safe_filename(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>();

    let trimmed = name.trim_start_matches('.').trim();
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl FileSink for DirectoryFileSink {
    async fn save(&self, filename: &str, content: &[u8]) -> Result<PathBuf, ApplicationError> {
        let name = safe_filename(filename);
        let target = self.dir.join(&name);
        let temp = self.dir.join(format!(".{}.{}.part", name, Uuid::new_v4()));

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ApplicationError::IoError(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        let written = match tokio::fs::write(&temp, content).await {
            Ok(()) => tokio::fs::rename(&temp, &target).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
                warn!("Could not remove {}: {}", temp.display(), cleanup);
            }
            return Err(ApplicationError::IoError(format!(
                "Failed to save {}: {}",
                target.display(),
                e
            )));
        }

        info!("Saved {} bytes to {}", content.len(), target.display());
        Ok(target)
    }
}
