use tracing::{info, warn};

use crate::application::services::{Notification, NotificationLevel, Notifier};

/// Routes notifications into the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => {
                info!(title = %notification.title, "{}", notification.description)
            }
            NotificationLevel::Error => {
                warn!(title = %notification.title, "{}", notification.description)
            }
        }
    }
}
