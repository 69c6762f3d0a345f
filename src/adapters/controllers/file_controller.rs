use std::{path::PathBuf, sync::Arc};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    application::{
        context::RequestContext,
        error::ApplicationError,
        services::{FileSink, FileStoreApi},
    },
    domain::models::{
        file::{FileId, FileRecord},
        pagination::{PageRequest, Pagination},
        search::SearchFilters,
    },
};

pub const LOAD_FAILED: &str = "Failed to load files";
pub const SEARCH_FAILED: &str = "Search failed";
pub const DELETE_FAILED: &str = "Delete failed";
pub const DOWNLOAD_FAILED: &str = "Download failed";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListingMode {
    #[default]
    Browse,
    Search(SearchFilters),
}

/// Consistent view of the listing at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct FileListState {
    pub records: Vec<FileRecord>,
    pub pagination: Pagination,
    pub loading: bool,
    pub error: Option<String>,
    pub mode: ListingMode,
}

#[derive(Default)]
struct Inner {
    records: Vec<FileRecord>,
    pagination: Pagination,
    in_flight: usize,
    error: Option<String>,
    mode: ListingMode,
}

/// Keeps the loading flag raised while a fetch is pending, including when the
/// fetch future is dropped early.
struct InFlight<'a>(&'a Mutex<Inner>);

impl<'a> InFlight<'a> {
    fn begin(state: &'a Mutex<Inner>) -> Self {
        state.lock().in_flight += 1;
        Self(state)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut inner = self.0.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
    }
}

/// Owns the current page of records. Successful fetches replace records and
/// pagination together; failed ones leave them untouched.
pub struct FileDataClient {
    api: Arc<dyn FileStoreApi>,
    ctx: RequestContext,
    sink: Arc<dyn FileSink>,
    page_size: u32,
    state: Mutex<Inner>,
}

impl FileDataClient {
    pub fn new(
        api: Arc<dyn FileStoreApi>,
        ctx: RequestContext,
        sink: Arc<dyn FileSink>,
        page_size: u32,
    ) -> Self {
        Self {
            api,
            ctx,
            sink,
            page_size: page_size.max(1),
            state: Mutex::new(Inner::default()),
        }
    }

    /// Loads a page of the unfiltered listing and switches to browse mode.
    pub async fn load_page(&self, page: u32) -> Result<(), ApplicationError> {
        self.fetch(ListingMode::Browse, page).await.map(|_| ())
    }

    /// Loads a page of search results and switches to search mode.
    pub async fn search(&self, filters: SearchFilters, page: u32) -> Result<(), ApplicationError> {
        self.fetch(ListingMode::Search(filters), page).await.map(|_| ())
    }

    /// Navigates within the current mode. Pages outside `1..=total_pages` are
    /// rejected without contacting the server.
    pub async fn go_to_page(&self, page: u32) -> Result<(), ApplicationError> {
        let (pagination, mode) = {
            let inner = self.state.lock();
            (inner.pagination, inner.mode.clone())
        };

        if !pagination.contains(page) {
            debug!("Rejected navigation to page {} of {}", page, pagination.total_pages);
            return Err(ApplicationError::PageOutOfRange {
                requested: page,
                total_pages: pagination.total_pages,
            });
        }

        self.fetch(mode, page).await.map(|_| ())
    }

    /// Reloads the current page in the current mode.
    pub async fn refresh(&self) -> Result<(), ApplicationError> {
        let (page, mode) = {
            let inner = self.state.lock();
            (inner.pagination.current_page, inner.mode.clone())
        };
        self.fetch(mode, page).await.map(|_| ())
    }

    /// Returns to plain pagination over the full set, starting at page 1.
    pub async fn clear_search(&self) -> Result<(), ApplicationError> {
        self.load_page(1).await
    }

    /// Deletes a record remotely, then reloads. Nothing is removed locally
    /// before the server confirms.
    pub async fn delete_record(&self, id: FileId) -> Result<(), ApplicationError> {
        if let Err(e) = self.api.delete_file(&self.ctx, id).await {
            let message = e.user_message(DELETE_FAILED);
            warn!("Delete of file {} failed: {}", id, e);
            self.state.lock().error = Some(message);
            return Err(e);
        }
        info!("Deleted file {}", id);

        let (target, mode) = {
            let inner = self.state.lock();
            let current = inner.pagination.current_page;
            let emptied = !inner.records.is_empty() && inner.records.iter().all(|r| r.id == id);
            let target = if emptied && current > 1 { current - 1 } else { current };
            (target, inner.mode.clone())
        };

        // The reload reports its own failure through the error flag.
        if let Ok(raw) = self.fetch(mode.clone(), target).await {
            if raw.total_pages >= 1 && raw.current_page > raw.total_pages {
                let _ = self.fetch(mode, raw.total_pages).await;
            }
        }

        Ok(())
    }

    /// Downloads a record and saves it locally under `filename`.
    pub async fn download_record(
        &self,
        id: FileId,
        filename: &str,
    ) -> Result<PathBuf, ApplicationError> {
        let result = match self.api.download_file(&self.ctx, id).await {
            Ok(content) => self.sink.save(filename, &content).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(path) => {
                info!("Downloaded file {} to {}", id, path.display());
                Ok(path)
            }
            Err(e) => {
                warn!("Download of file {} failed: {}", id, e);
                self.state.lock().error = Some(e.user_message(DOWNLOAD_FAILED));
                Err(e)
            }
        }
    }

    pub fn preview_url(&self, id: FileId) -> String {
        self.api.preview_url(&self.ctx, id)
    }

    pub fn snapshot(&self) -> FileListState {
        let inner = self.state.lock();
        FileListState {
            records: inner.records.clone(),
            pagination: inner.pagination,
            loading: inner.in_flight > 0,
            error: inner.error.clone(),
            mode: inner.mode.clone(),
        }
    }

    pub fn records(&self) -> Vec<FileRecord> {
        self.state.lock().records.clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.state.lock().pagination
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn mode(&self) -> ListingMode {
        self.state.lock().mode.clone()
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.state.lock().mode, ListingMode::Search(_))
    }

    /// Fetches one page and applies it; returns the pagination as reported.
    /// Mode, records and pagination change together, and only on success.
    async fn fetch(&self, mode: ListingMode, page: u32) -> Result<Pagination, ApplicationError> {
        if page == 0 {
            let total_pages = self.state.lock().pagination.total_pages;
            debug!("Rejected request for page 0");
            return Err(ApplicationError::PageOutOfRange {
                requested: page,
                total_pages,
            });
        }
        let request = PageRequest::new(page, self.page_size);

        let _in_flight = InFlight::begin(&self.state);
        let (result, fallback) = match &mode {
            ListingMode::Browse => (self.api.list_files(&self.ctx, request).await, LOAD_FAILED),
            ListingMode::Search(filters) => (
                self.api.search_files(&self.ctx, filters, request).await,
                SEARCH_FAILED,
            ),
        };

        let mut inner = self.state.lock();
        match result {
            Ok(page) => {
                let raw = page.pagination;
                debug!(
                    "Loaded page {}/{} ({} records)",
                    raw.current_page,
                    raw.total_pages,
                    page.files.len()
                );
                inner.records = page.files;
                inner.pagination = raw.normalized();
                inner.mode = mode;
                inner.error = None;
                Ok(raw)
            }
            Err(e) => {
                warn!("Fetching page {} failed: {}", request.page, e);
                inner.error = Some(e.user_message(fallback));
                Err(e)
            }
        }
    }
}
