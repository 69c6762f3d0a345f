use std::{fmt, sync::Arc};

use crate::domain::models::session::Session;

/// Per-call request context. Carries the bearer token of the session it was
/// built from; an anonymous context sends unauthenticated requests.
#[derive(Clone, Default)]
pub struct RequestContext {
    bearer_token: Option<Arc<str>>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: &str) -> Self {
        Self {
            bearer_token: Some(Arc::from(token)),
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }
}

impl From<&Session> for RequestContext {
    fn from(session: &Session) -> Self {
        Self::authenticated(&session.token)
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
