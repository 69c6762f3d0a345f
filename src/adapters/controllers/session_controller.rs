use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    application::{
        context::RequestContext, error::ApplicationError,
        repositories::credential_repository::CredentialRepository, services::FileStoreApi,
    },
    domain::models::session::{Credentials, Session},
};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Current authenticated identity. Single writer: only login, restore and
/// logout change it.
pub struct SessionStore {
    api: Arc<dyn FileStoreApi>,
    repository: Arc<dyn CredentialRepository>,
    session: Option<Session>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn FileStoreApi>, repository: Arc<dyn CredentialRepository>) -> Self {
        Self {
            api,
            repository,
            session: None,
        }
    }

    /// Picks up a previously persisted session, if any.
    pub async fn restore(&mut self) -> Result<Option<&Session>, ApplicationError> {
        let stored = self.repository.load().await?;
        if let Some(ref session) = stored {
            info!("Restored session for {}", session.username);
        }
        self.session = stored;
        Ok(self.session.as_ref())
    }

    /// Authenticates and persists the session. On failure nothing changes.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<&Session, ApplicationError> {
        let credentials = Credentials::new(username.trim(), password);
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(ApplicationError::BadRequest(
                "Username and password are required".to_string(),
            ));
        }

        let token = self.api.login(&credentials).await.map_err(|e| {
            warn!("Login for {} rejected: {}", credentials.username, e);
            e
        })?;

        let session = Session {
            username: credentials.username,
            token,
        };
        if let Err(e) = self.repository.save(&session).await {
            warn!("Could not persist session: {}", e);
        }

        info!("Logged in as {}", session.username);
        Ok(self.session.insert(session))
    }

    /// Creates an account. Does not log in.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<(), ApplicationError> {
        if password != confirmation {
            return Err(ApplicationError::BadRequest(
                "Passwords don't match".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ApplicationError::BadRequest(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }
        let credentials = Credentials::new(username.trim(), password);
        if credentials.username.is_empty() {
            return Err(ApplicationError::BadRequest("Username is required".to_string()));
        }

        self.api.register(&credentials).await.map_err(|e| {
            warn!("Registration for {} rejected: {}", credentials.username, e);
            e
        })?;
        info!("Registered {}", credentials.username);
        Ok(())
    }

    pub async fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!("Logged out {}", session.username);
        }
        if let Err(e) = self.repository.clear().await {
            warn!("Could not clear persisted session: {}", e);
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Context for outgoing calls; anonymous when logged out.
    pub fn request_context(&self) -> RequestContext {
        self.session
            .as_ref()
            .map(RequestContext::from)
            .unwrap_or_default()
    }
}
