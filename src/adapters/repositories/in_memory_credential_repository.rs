use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    application::{error::ApplicationError, repositories::credential_repository::CredentialRepository},
    domain::models::session::Session,
};

/// Keeps the session for the lifetime of the process only.
#[derive(Default)]
pub struct InMemoryCredentialRepository {
    session: Mutex<Option<Session>>,
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn load(&self) -> Result<Option<Session>, ApplicationError> {
        Ok(self.session.lock().clone())
    }

    async fn save(&self, session: &Session) -> Result<(), ApplicationError> {
        *self.session.lock() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ApplicationError> {
        self.session.lock().take();
        Ok(())
    }
}
