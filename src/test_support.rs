//! Scripted fakes shared by the unit tests.

use std::{
    collections::{HashMap, VecDeque},
    path::PathBuf,
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::{
    application::{
        context::RequestContext,
        error::ApplicationError,
        services::{FileSink, FileStoreApi, Notification, Notifier, ProgressSink},
    },
    domain::models::{
        file::{FileData, FileId, FileRecord},
        pagination::{FilePage, PageRequest, Pagination},
        search::SearchFilters,
        session::Credentials,
        stats::StorageStats,
    },
};

pub fn record(id: FileId, filename: &str) -> FileRecord {
    FileRecord {
        id,
        filename: filename.to_string(),
        size: 1024,
        mime_type: "text/plain".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    }
}

pub fn page(files: Vec<FileRecord>, current_page: u32, total_pages: u32, total_files: u64) -> FilePage {
    FilePage {
        files,
        pagination: Pagination {
            current_page,
            total_pages,
            total_files,
        },
    }
}

#[derive(Default)]
pub struct MockFileStoreApi {
    pub page_responses: Mutex<VecDeque<Result<FilePage, ApplicationError>>>,
    pub list_calls: Mutex<Vec<PageRequest>>,
    pub search_calls: Mutex<Vec<(SearchFilters, PageRequest)>>,
    pub upload_results: Mutex<HashMap<String, Result<String, ApplicationError>>>,
    pub upload_progress: Mutex<HashMap<String, Vec<(u64, u64)>>>,
    pub upload_gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub progress_sinks: Mutex<Vec<(String, ProgressSink)>>,
    pub delete_error: Mutex<Option<ApplicationError>>,
    pub delete_calls: Mutex<Vec<FileId>>,
    pub download_result: Mutex<Option<Result<Vec<u8>, ApplicationError>>>,
    pub stats_result: Mutex<Option<Result<StorageStats, ApplicationError>>>,
    pub login_result: Mutex<Option<Result<String, ApplicationError>>>,
    pub register_error: Mutex<Option<ApplicationError>>,
    pub auth_calls: Mutex<Vec<Credentials>>,
    pub seen_tokens: Mutex<Vec<Option<String>>>,
}

impl MockFileStoreApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_page(&self, response: Result<FilePage, ApplicationError>) {
        self.page_responses.lock().push_back(response);
    }

    pub fn set_upload_result(&self, filename: &str, result: Result<String, ApplicationError>) {
        self.upload_results.lock().insert(filename.to_string(), result);
    }

    pub fn set_upload_progress(&self, filename: &str, steps: Vec<(u64, u64)>) {
        self.upload_progress.lock().insert(filename.to_string(), steps);
    }

    /// Holds the upload of `filename` until the returned gate is notified.
    pub fn gate_upload(&self, filename: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.upload_gates
            .lock()
            .insert(filename.to_string(), gate.clone());
        gate
    }

    pub fn total_page_calls(&self) -> usize {
        self.list_calls.lock().len() + self.search_calls.lock().len()
    }

    fn next_page(&self) -> Result<FilePage, ApplicationError> {
        self.page_responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(page(Vec::new(), 1, 1, 0)))
    }

    fn observe(&self, ctx: &RequestContext) {
        self.seen_tokens
            .lock()
            .push(ctx.bearer_token().map(str::to_string));
    }
}

#[async_trait]
impl FileStoreApi for MockFileStoreApi {
    async fn login(&self, credentials: &Credentials) -> Result<String, ApplicationError> {
        self.auth_calls.lock().push(credentials.clone());
        self.login_result
            .lock()
            .clone()
            .unwrap_or_else(|| Ok("token-123".to_string()))
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), ApplicationError> {
        self.auth_calls.lock().push(credentials.clone());
        match self.register_error.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn list_files(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<FilePage, ApplicationError> {
        self.observe(ctx);
        self.list_calls.lock().push(page);
        tokio::task::yield_now().await;
        self.next_page()
    }

    async fn search_files(
        &self,
        ctx: &RequestContext,
        filters: &SearchFilters,
        page: PageRequest,
    ) -> Result<FilePage, ApplicationError> {
        self.observe(ctx);
        self.search_calls.lock().push((filters.clone(), page));
        tokio::task::yield_now().await;
        self.next_page()
    }

    async fn upload(
        &self,
        ctx: &RequestContext,
        file: FileData,
        progress: ProgressSink,
    ) -> Result<String, ApplicationError> {
        self.observe(ctx);
        self.progress_sinks
            .lock()
            .push((file.filename.clone(), progress.clone()));

        let steps = self
            .upload_progress
            .lock()
            .get(&file.filename)
            .cloned()
            .unwrap_or_default();
        for (loaded, total) in steps {
            progress(loaded, total);
            tokio::task::yield_now().await;
        }

        let gate = self.upload_gates.lock().get(&file.filename).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.upload_results
            .lock()
            .get(&file.filename)
            .cloned()
            .unwrap_or_else(|| Ok(format!("hash-{}", file.filename)))
    }

    async fn delete_file(&self, ctx: &RequestContext, id: FileId) -> Result<(), ApplicationError> {
        self.observe(ctx);
        self.delete_calls.lock().push(id);
        match self.delete_error.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn download_file(
        &self,
        ctx: &RequestContext,
        _id: FileId,
    ) -> Result<Vec<u8>, ApplicationError> {
        self.observe(ctx);
        self.download_result
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(b"content".to_vec()))
    }

    async fn stats(&self, ctx: &RequestContext) -> Result<StorageStats, ApplicationError> {
        self.observe(ctx);
        tokio::task::yield_now().await;
        self.stats_result
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(StorageStats::default()))
    }

    fn preview_url(&self, _ctx: &RequestContext, id: FileId) -> String {
        format!("mock://files/{}", id)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

#[derive(Default)]
pub struct MemorySink {
    pub saved: Mutex<Vec<(String, Vec<u8>)>>,
    pub fail_with: Mutex<Option<ApplicationError>>,
}

#[async_trait]
impl FileSink for MemorySink {
    async fn save(&self, filename: &str, content: &[u8]) -> Result<PathBuf, ApplicationError> {
        if let Some(err) = self.fail_with.lock().clone() {
            return Err(err);
        }
        self.saved
            .lock()
            .push((filename.to_string(), content.to_vec()));
        Ok(PathBuf::from(filename))
    }
}
