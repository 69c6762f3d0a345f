pub mod file_sink;
pub mod file_store_service;
pub mod notifier;

pub use file_sink::FileSink;
pub use file_store_service::{FileStoreApi, ProgressSink};
pub use notifier::{Notification, NotificationLevel, Notifier};
