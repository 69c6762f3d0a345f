use async_trait::async_trait;

use crate::{application::error::ApplicationError, domain::models::session::Session};

/// Persistence for the authenticated session between runs.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, ApplicationError>;
    async fn save(&self, session: &Session) -> Result<(), ApplicationError>;
    async fn clear(&self) -> Result<(), ApplicationError>;
}
