use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    application::{context::RequestContext, error::ApplicationError},
    domain::models::{
        file::{FileData, FileId},
        pagination::{FilePage, PageRequest},
        search::SearchFilters,
        session::Credentials,
        stats::StorageStats,
    },
};

/// Receives `(bytes_sent, total_bytes)` while an upload body is transmitted.
pub type ProgressSink = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// The remote file store. Every call carries an explicit request context.
#[async_trait]
pub trait FileStoreApi: Send + Sync {
    /// Returns the bearer token issued for the credentials.
    async fn login(&self, credentials: &Credentials) -> Result<String, ApplicationError>;
    async fn register(&self, credentials: &Credentials) -> Result<(), ApplicationError>;

    async fn list_files(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<FilePage, ApplicationError>;

    async fn search_files(
        &self,
        ctx: &RequestContext,
        filters: &SearchFilters,
        page: PageRequest,
    ) -> Result<FilePage, ApplicationError>;

    /// Uploads one file and returns the content hash computed by the server.
    async fn upload(
        &self,
        ctx: &RequestContext,
        file: FileData,
        progress: ProgressSink,
    ) -> Result<String, ApplicationError>;

    async fn delete_file(&self, ctx: &RequestContext, id: FileId) -> Result<(), ApplicationError>;
    async fn download_file(
        &self,
        ctx: &RequestContext,
        id: FileId,
    ) -> Result<Vec<u8>, ApplicationError>;
    async fn stats(&self, ctx: &RequestContext) -> Result<StorageStats, ApplicationError>;

    /// Direct URL for inline previews; the token travels as a query parameter.
    fn preview_url(&self, ctx: &RequestContext, id: FileId) -> String;
}
