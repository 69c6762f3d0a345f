mod error;
mod http_file_store;

pub use error::StorageError;
pub use http_file_store::HttpFileStoreApi;

use std::sync::Arc;

use crate::{application::services::FileStoreApi, domain::config::client::ClientConfig};

pub fn create_file_store_api(config: &ClientConfig) -> Arc<dyn FileStoreApi> {
    Arc::new(HttpFileStoreApi::new(&config.api_base_url))
}
