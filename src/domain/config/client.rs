use std::path::PathBuf;

use crate::{application::error::ApplicationError, domain::models::pagination::DEFAULT_PAGE_SIZE};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_CREDENTIALS_FILE: &str = ".vault-session.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub page_size: u32,
    pub download_dir: PathBuf,
    pub credentials_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            download_dir: PathBuf::from("."),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApplicationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("VAULT_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url;
        }

        if let Some(raw) = lookup("VAULT_PAGE_SIZE") {
            let page_size = raw.trim().parse::<u32>().map_err(|_| {
                ApplicationError::Configuration(format!("VAULT_PAGE_SIZE is not a number: {}", raw))
            })?;
            if page_size == 0 {
                return Err(ApplicationError::Configuration(
                    "VAULT_PAGE_SIZE must be at least 1".to_string(),
                ));
            }
            config.page_size = page_size;
        }

        if let Some(dir) = lookup("VAULT_DOWNLOAD_DIR").filter(|v| !v.is_empty()) {
            config.download_dir = PathBuf::from(dir);
        }

        if let Some(path) = lookup("VAULT_CREDENTIALS_PATH").filter(|v| !v.is_empty()) {
            config.credentials_path = PathBuf::from(path);
        }

        let url = config.api_base_url.clone();
        Ok(config.with_api_base_url(url))
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }
}
