use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplicationError {
    #[error("Not found{}", suffix(.0))]
    NotFound(Option<String>),

    #[error("Unauthorized{}", suffix(.0))]
    Unauthorized(Option<String>),

    #[error("Request rejected with status {status}{}", suffix(.message))]
    Rejected { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Page {requested} is outside 1..={total_pages}")]
    PageOutOfRange { requested: u32, total_pages: u32 },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl ApplicationError {
    /// The human-readable message carried by the server's error payload, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApplicationError::NotFound(message)
            | ApplicationError::Unauthorized(message)
            | ApplicationError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Message shown to the user: the server's message, the client-side
    /// validation text, or the per-operation fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApplicationError::BadRequest(msg) => msg.clone(),
            ApplicationError::PageOutOfRange { .. } => self.to_string(),
            _ => self
                .server_message()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(fallback)
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_server_message() {
        let error = ApplicationError::Rejected {
            status: 507,
            message: Some("quota exceeded".into()),
        };
        assert_eq!(error.user_message("Upload failed"), "quota exceeded");
        assert_eq!(error.to_string(), "Request rejected with status 507: quota exceeded");
    }

    #[test]
    fn falls_back_without_server_message() {
        let error = ApplicationError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(error.user_message("Search failed"), "Search failed");

        let error = ApplicationError::NetworkError("connection refused".into());
        assert_eq!(error.user_message("Failed to load files"), "Failed to load files");

        let error = ApplicationError::Unauthorized(Some("  ".into()));
        assert_eq!(error.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn validation_errors_keep_their_text() {
        let error = ApplicationError::BadRequest("Invalid start date".into());
        assert_eq!(error.user_message("Search failed"), "Invalid start date");
    }
}
