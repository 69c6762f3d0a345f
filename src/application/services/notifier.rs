#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A one-shot user-facing message (a "toast").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Fire-and-forget notification channel to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
