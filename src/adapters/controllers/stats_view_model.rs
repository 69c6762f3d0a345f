use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::{
    application::{context::RequestContext, error::ApplicationError, services::FileStoreApi},
    domain::{
        format::{clamp_percentage, format_bytes, format_percentage},
        models::stats::StorageStats,
    },
};

pub const STATS_FAILED: &str = "Failed to load stats";

/// Display-ready storage figures. Percentages are clamped into [0, 100] for
/// display only; the raw stats are left as received.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsViewModel {
    pub quota_used_percentage: f64,
    pub savings_percentage: f64,
    pub quota_label: String,
    pub physical_size: String,
    pub savings_size: String,
    pub file_count: u64,
}

impl StatsViewModel {
    pub fn new(stats: &StorageStats, file_count: u64) -> Self {
        let savings = stats
            .original_storage_used_bytes
            .saturating_sub(stats.total_storage_used_bytes);

        Self {
            quota_used_percentage: clamp_percentage(stats.quota_used_percentage),
            savings_percentage: clamp_percentage(stats.storage_savings_percentage),
            quota_label: format!(
                "{} / {}MB",
                format_bytes(stats.original_storage_used_bytes),
                stats.storage_quota_mb
            ),
            physical_size: format_bytes(stats.total_storage_used_bytes),
            savings_size: format_bytes(savings),
            file_count,
        }
    }

    pub fn quota_text(&self) -> String {
        format!("{} of quota used", format_percentage(self.quota_used_percentage))
    }

    pub fn savings_text(&self) -> String {
        format!("{} savings", format_percentage(self.savings_percentage))
    }
}

#[derive(Debug, Default)]
struct StatsState {
    stats: Option<StorageStats>,
    in_flight: usize,
    error: Option<String>,
}

/// Counts a pending load for as long as it lives, so overlapping loads keep
/// the flag raised until the last one resolves.
struct Loading<'a>(&'a Mutex<StatsState>);

impl<'a> Loading<'a> {
    fn begin(state: &'a Mutex<StatsState>) -> Self {
        state.lock().in_flight += 1;
        Self(state)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

/// Fetches `/stats` and keeps the last successful result.
pub struct StatsClient {
    api: Arc<dyn FileStoreApi>,
    ctx: RequestContext,
    state: Mutex<StatsState>,
}

impl StatsClient {
    pub fn new(api: Arc<dyn FileStoreApi>, ctx: RequestContext) -> Self {
        Self {
            api,
            ctx,
            state: Mutex::new(StatsState::default()),
        }
    }

    pub async fn load(&self) -> Result<(), ApplicationError> {
        let _loading = Loading::begin(&self.state);
        let result = self.api.stats(&self.ctx).await;

        let mut state = self.state.lock();
        match result {
            Ok(stats) => {
                info!(
                    "Loaded storage stats: {} stored, {} before dedup",
                    stats.total_storage_used_bytes, stats.original_storage_used_bytes
                );
                state.stats = Some(stats);
                state.error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Loading stats failed: {}", e);
                state.error = Some(e.user_message(STATS_FAILED));
                Err(e)
            }
        }
    }

    pub fn stats(&self) -> Option<StorageStats> {
        self.state.lock().stats.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// View model for the last loaded stats, if any.
    pub fn view(&self, file_count: u64) -> Option<StatsViewModel> {
        self.state
            .lock()
            .stats
            .as_ref()
            .map(|stats| StatsViewModel::new(stats, file_count))
    }
}
