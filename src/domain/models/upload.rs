use std::fmt;

use uuid::Uuid;

use crate::domain::format::format_bytes;

/// Opaque per-task handle assigned at enqueue time. Progress and completion
/// are correlated by handle, never by filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadHandle(Uuid);

impl UploadHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UploadHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UploadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Queued,
    Uploading,
    Succeeded,
    Failed,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Succeeded | UploadStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadTask {
    pub handle: UploadHandle,
    pub name: String,
    /// Position in the task list at insertion; distinguishes equal names.
    pub index: usize,
    pub size: u64,
    pub status: UploadStatus,
    pub progress: u8,
    pub hash: Option<String>,
    pub error: Option<String>,
}

impl UploadTask {
    pub fn new(name: String, size: u64, index: usize) -> Self {
        Self {
            handle: UploadHandle::new(),
            name,
            index,
            size,
            status: UploadStatus::Queued,
            progress: 0,
            hash: None,
            error: None,
        }
    }

    pub fn display_key(&self) -> String {
        format!("{}-{}", self.name, self.index)
    }

    pub fn display_size(&self) -> String {
        format_bytes(self.size)
    }

    pub fn short_hash(&self) -> Option<&str> {
        self.hash
            .as_deref()
            .map(|hash| hash.get(..8).unwrap_or(hash))
    }

    pub fn start(&mut self) {
        if self.status == UploadStatus::Queued {
            self.status = UploadStatus::Uploading;
            self.progress = 0;
        }
    }

    /// Applies a progress report; ignored unless uploading and the value moves forward.
    pub fn advance(&mut self, progress: u8) -> bool {
        if self.status != UploadStatus::Uploading {
            return false;
        }
        let progress = progress.min(100);
        if progress <= self.progress {
            return false;
        }
        self.progress = progress;
        true
    }

    pub fn succeed(&mut self, hash: String) -> bool {
        if self.status != UploadStatus::Uploading {
            return false;
        }
        self.status = UploadStatus::Succeeded;
        self.progress = 100;
        self.hash = Some(hash);
        true
    }

    pub fn fail(&mut self, message: String) -> bool {
        if self.status != UploadStatus::Uploading {
            return false;
        }
        self.status = UploadStatus::Failed;
        self.error = Some(message);
        true
    }
}

/// Percentage of `loaded` over `total`, rounded; `None` when the total is unknown.
pub fn progress_percent(loaded: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let percent = ((loaded.min(total) as f64 * 100.0) / total as f64).round();
    Some(percent as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploading(name: &str) -> UploadTask {
        let mut task = UploadTask::new(name.to_string(), 500, 0);
        task.start();
        task
    }

    #[test]
    fn progress_is_monotonic_while_uploading() {
        let mut task = uploading("a.txt");
        assert!(task.advance(30));
        assert!(!task.advance(20));
        assert_eq!(task.progress, 30);
        assert!(task.advance(150));
        assert_eq!(task.progress, 100);
    }

    #[test]
    fn terminal_states_are_final() {
        let mut task = uploading("a.txt");
        assert!(task.succeed("abc123def456".into()));
        assert_eq!(task.progress, 100);
        assert!(!task.fail("late".into()));
        assert!(!task.advance(50));
        assert_eq!(task.status, UploadStatus::Succeeded);
        assert_eq!(task.short_hash(), Some("abc123de"));
        assert!(task.error.is_none());
    }

    #[test]
    fn queued_task_ignores_completion() {
        let mut task = UploadTask::new("b.txt".into(), 0, 1);
        assert!(!task.succeed("h".into()));
        assert_eq!(task.status, UploadStatus::Queued);
        assert_eq!(task.display_key(), "b.txt-1");
        assert_eq!(task.display_size(), "0 B");
    }

    #[test]
    fn computes_rounded_percentages() {
        assert_eq!(progress_percent(0, 0), None);
        assert_eq!(progress_percent(1, 3), Some(33));
        assert_eq!(progress_percent(2, 3), Some(67));
        assert_eq!(progress_percent(9, 3), Some(100));
    }
}
