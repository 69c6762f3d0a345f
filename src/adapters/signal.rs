use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingEvent {
    /// Stored files changed (an upload succeeded).
    FilesChanged,
    /// Search criteria were cleared; the listing returns to plain pagination.
    SearchCleared,
}

/// Sending half of the channel between producers (uploads, search form) and
/// the listing owner. Sending never blocks and never fails the producer.
#[derive(Debug, Clone)]
pub struct ListingSignal {
    tx: mpsc::UnboundedSender<ListingEvent>,
}

impl ListingSignal {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ListingEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn files_changed(&self) {
        self.send(ListingEvent::FilesChanged);
    }

    pub fn search_cleared(&self) {
        self.send(ListingEvent::SearchCleared);
    }

    fn send(&self, event: ListingEvent) {
        if self.tx.send(event).is_err() {
            debug!("Listing receiver dropped, {:?} discarded", event);
        }
    }
}
