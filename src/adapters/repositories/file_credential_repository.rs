use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    application::{error::ApplicationError, repositories::credential_repository::CredentialRepository},
    domain::models::session::Session,
};

/// Stores the session as a small JSON document on disk.
pub struct FileCredentialRepository {
    path: PathBuf,
}

impl FileCredentialRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, action: &str, e: std::io::Error) -> ApplicationError {
        ApplicationError::IoError(format!(
            "Failed to {} {}: {}",
            action,
            self.path.display(),
            e
        ))
    }
}

#[async_trait]
impl CredentialRepository for FileCredentialRepository {
    async fn load(&self) -> Result<Option<Session>, ApplicationError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored session at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(self.io_error("read", e)),
        };

        let session = serde_json::from_slice::<Session>(&raw).map_err(|e| {
            ApplicationError::InvalidResponse(format!(
                "Stored session at {} is corrupt: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<(), ApplicationError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error("create directory for", e))?;
        }

        let body = serde_json::to_vec_pretty(session)
            .map_err(|e| ApplicationError::IoError(format!("Failed to encode session: {}", e)))?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| self.io_error("write", e))?;

        info!("Session saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ApplicationError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error("remove", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            username: "alice".into(),
            token: "tok".into(),
        }
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileCredentialRepository::new(dir.path().join("session.json"));
        assert!(repo.load().await.unwrap().is_none());
        repo.clear().await.unwrap();
    }

    #[tokio::test]
    async fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileCredentialRepository::new(dir.path().join("nested/session.json"));

        repo.save(&session()).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(session()));

        repo.clear().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();
        let repo = FileCredentialRepository::new(path);
        assert!(matches!(
            repo.load().await,
            Err(ApplicationError::InvalidResponse(_))
        ));
    }
}
