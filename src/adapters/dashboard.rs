use std::sync::Arc;

use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};
use tracing::{debug, info, warn};

use crate::{
    adapters::{
        controllers::{
            FileDataClient, SearchFilterBuilder, StatsClient, StatsViewModel, UploadController,
        },
        signal::{ListingEvent, ListingSignal},
    },
    application::{
        context::RequestContext,
        error::ApplicationError,
        services::{FileSink, FileStoreApi, Notifier},
    },
};

/// Composes the listing, the upload queue, the search form and the stats
/// panel for one authenticated session, and routes the events between them.
pub struct Dashboard {
    files: FileDataClient,
    uploads: UploadController,
    filters: SearchFilterBuilder,
    stats: StatsClient,
    events: UnboundedReceiver<ListingEvent>,
}

impl Dashboard {
    pub fn new(
        api: Arc<dyn FileStoreApi>,
        ctx: RequestContext,
        sink: Arc<dyn FileSink>,
        notifier: Arc<dyn Notifier>,
        page_size: u32,
    ) -> Self {
        let (signal, events) = ListingSignal::channel();
        Self {
            files: FileDataClient::new(api.clone(), ctx.clone(), sink, page_size),
            uploads: UploadController::new(api.clone(), ctx.clone(), notifier, signal.clone()),
            filters: SearchFilterBuilder::new().with_signal(signal),
            stats: StatsClient::new(api, ctx),
            events,
        }
    }

    pub fn files(&self) -> &FileDataClient {
        &self.files
    }

    pub fn uploads(&self) -> &UploadController {
        &self.uploads
    }

    pub fn filters(&self) -> &SearchFilterBuilder {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut SearchFilterBuilder {
        &mut self.filters
    }

    pub fn stats(&self) -> &StatsClient {
        &self.stats
    }

    /// Initial load: first page of the listing plus the stats panel. Each
    /// part keeps its own error state, so one failing does not block the other.
    pub async fn open(&self) {
        let (listing, stats) = tokio::join!(self.files.load_page(1), self.stats.load());
        if let Err(e) = listing {
            debug!("Initial listing failed: {}", e);
        }
        if let Err(e) = stats {
            debug!("Initial stats failed: {}", e);
        }
    }

    /// Drains pending listing events and reacts to them. Returns how many
    /// events were handled.
    pub async fn process_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let event = match self.events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            handled += 1;
            self.handle_event(event).await;
        }
        handled
    }

    async fn handle_event(&self, event: ListingEvent) {
        match event {
            ListingEvent::FilesChanged => {
                if self.files.is_searching() {
                    debug!("Files changed while searching, listing left as is");
                    return;
                }
                if let Err(e) = self.files.refresh().await {
                    warn!("Refresh after upload failed: {}", e);
                }
                if let Err(e) = self.stats.load().await {
                    warn!("Stats reload after upload failed: {}", e);
                }
            }
            ListingEvent::SearchCleared => {
                info!("Search cleared, back to browsing");
                if let Err(e) = self.files.clear_search().await {
                    warn!("Reload after clearing search failed: {}", e);
                }
            }
        }
    }

    /// Runs the current form as a search from page 1. A form with no
    /// criteria browses the full listing instead.
    pub async fn apply_search(&self) -> Result<(), ApplicationError> {
        let filters = self.filters.build()?;
        if filters.is_empty() {
            return self.files.load_page(1).await;
        }
        self.files.search(filters, 1).await
    }

    /// Resets the form and returns the listing to plain pagination.
    pub async fn clear_search(&mut self) {
        self.filters.clear();
        self.process_events().await;
    }

    /// Stats panel figures, with the file count taken from the listing.
    pub fn stats_view(&self) -> Option<StatsViewModel> {
        self.stats.view(self.files.pagination().total_files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::controllers::ListingMode,
        application::error::ApplicationError,
        domain::models::{file::FileData, stats::StorageStats},
        test_support::{page, record, MemorySink, MockFileStoreApi, RecordingNotifier},
    };

    fn dashboard(api: &Arc<MockFileStoreApi>) -> Dashboard {
        Dashboard::new(
            api.clone(),
            RequestContext::authenticated("tok"),
            Arc::new(MemorySink::default()),
            Arc::new(RecordingNotifier::default()),
            20,
        )
    }

    #[tokio::test]
    async fn upload_success_refreshes_listing_while_browsing() {
        let api = MockFileStoreApi::new();
        let mut dash = dashboard(&api);
        dash.open().await;
        assert_eq!(api.list_calls.lock().len(), 1);

        api.push_page(Ok(page(vec![record(1, "new.txt")], 1, 1, 1)));
        dash.uploads()
            .enqueue(vec![FileData::new(b"abc".to_vec(), "new.txt".into(), None)]);
        dash.uploads().wait_idle().await;

        assert_eq!(dash.process_events().await, 1);
        assert_eq!(api.list_calls.lock().len(), 2);
        assert_eq!(dash.files().records()[0].filename, "new.txt");
    }

    #[tokio::test]
    async fn upload_success_is_ignored_in_search_mode() {
        let api = MockFileStoreApi::new();
        let mut dash = dashboard(&api);
        dash.filters_mut().set_filename("report");
        dash.apply_search().await.unwrap();
        assert_eq!(api.search_calls.lock().len(), 1);

        dash.uploads()
            .enqueue(vec![FileData::new(b"abc".to_vec(), "x.txt".into(), None)]);
        dash.uploads().wait_idle().await;

        assert_eq!(dash.process_events().await, 1);
        assert_eq!(api.total_page_calls(), 1);
        assert!(dash.files().is_searching());
    }

    #[tokio::test]
    async fn failed_upload_sends_no_signal() {
        let api = MockFileStoreApi::new();
        api.set_upload_result("bad.txt", Err(ApplicationError::NetworkError("x".into())));
        let mut dash = dashboard(&api);

        dash.uploads()
            .enqueue(vec![FileData::new(Vec::new(), "bad.txt".into(), None)]);
        dash.uploads().wait_idle().await;
        assert_eq!(dash.process_events().await, 0);
    }

    #[tokio::test]
    async fn clearing_search_returns_to_first_page() {
        let api = MockFileStoreApi::new();
        let mut dash = dashboard(&api);
        dash.filters_mut().apply_size_preset("0-1024").unwrap();
        dash.apply_search().await.unwrap();
        assert!(matches!(dash.files().mode(), ListingMode::Search(_)));

        dash.clear_search().await;

        assert_eq!(dash.files().mode(), ListingMode::Browse);
        let calls = api.list_calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].page, 1);
    }

    #[tokio::test]
    async fn empty_form_browses_instead_of_searching() {
        let api = MockFileStoreApi::new();
        let dash = dashboard(&api);
        dash.apply_search().await.unwrap();
        assert!(api.search_calls.lock().is_empty());
        assert_eq!(api.list_calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn invalid_form_issues_no_request() {
        let api = MockFileStoreApi::new();
        let mut dash = dashboard(&api);
        dash.filters_mut().set_start_date("yesterday");
        assert!(dash.apply_search().await.is_err());
        assert_eq!(api.total_page_calls(), 0);
    }

    #[tokio::test]
    async fn stats_view_uses_listing_total() {
        let api = MockFileStoreApi::new();
        api.push_page(Ok(page(vec![record(1, "a")], 1, 3, 42)));
        *api.stats_result.lock() = Some(Ok(StorageStats {
            quota_used_percentage: 12.0,
            ..Default::default()
        }));
        let dash = dashboard(&api);
        dash.open().await;

        let view = dash.stats_view().unwrap();
        assert_eq!(view.file_count, 42);
        assert_eq!(view.quota_text(), "12.0% of quota used");
    }
}
