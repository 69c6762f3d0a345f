use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    adapters::signal::ListingSignal,
    application::{
        context::RequestContext,
        services::{FileStoreApi, Notification, Notifier, ProgressSink},
    },
    domain::models::{
        file::FileData,
        upload::{progress_percent, UploadHandle, UploadStatus, UploadTask},
    },
};

pub const UPLOAD_FAILED: &str = "Upload failed";

#[derive(Default)]
struct UploadQueue {
    tasks: Vec<UploadTask>,
    next_index: usize,
}

impl UploadQueue {
    fn find_mut(&mut self, handle: UploadHandle) -> Option<&mut UploadTask> {
        self.tasks.iter_mut().find(|t| t.handle == handle)
    }
}

/// Tracks concurrent uploads. Each file gets its own task and its own remote
/// call; one file's outcome never touches another's task.
pub struct UploadController {
    api: Arc<dyn FileStoreApi>,
    ctx: RequestContext,
    notifier: Arc<dyn Notifier>,
    signal: ListingSignal,
    queue: Arc<Mutex<UploadQueue>>,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl UploadController {
    pub fn new(
        api: Arc<dyn FileStoreApi>,
        ctx: RequestContext,
        notifier: Arc<dyn Notifier>,
        signal: ListingSignal,
    ) -> Self {
        Self {
            api,
            ctx,
            notifier,
            signal,
            queue: Arc::new(Mutex::new(UploadQueue::default())),
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Appends one task per file and starts every upload. Must be called from
    /// within a tokio runtime.
    pub fn enqueue(&self, files: Vec<FileData>) -> Vec<UploadHandle> {
        self.in_flight.lock().retain(|join| !join.is_finished());
        let mut handles = Vec::with_capacity(files.len());

        for file in files {
            let handle = {
                let mut queue = self.queue.lock();
                let index = queue.next_index;
                queue.next_index += 1;

                let mut task = UploadTask::new(file.filename.clone(), file.size(), index);
                task.start();
                let handle = task.handle;
                queue.tasks.push(task);
                handle
            };

            info!("Queued upload {} ({} bytes)", file.filename, file.size());
            let join = tokio::spawn(Self::run_upload(
                self.api.clone(),
                self.ctx.clone(),
                self.notifier.clone(),
                self.signal.clone(),
                self.queue.clone(),
                handle,
                file,
            ));
            self.in_flight.lock().push(join);
            handles.push(handle);
        }

        handles
    }

    async fn run_upload(
        api: Arc<dyn FileStoreApi>,
        ctx: RequestContext,
        notifier: Arc<dyn Notifier>,
        signal: ListingSignal,
        queue: Arc<Mutex<UploadQueue>>,
        handle: UploadHandle,
        file: FileData,
    ) {
        let name = file.filename.clone();

        let progress: ProgressSink = {
            let queue = queue.clone();
            Arc::new(move |loaded, total| {
                let Some(percent) = progress_percent(loaded, total) else {
                    return;
                };
                let mut queue = queue.lock();
                if let Some(task) = queue.find_mut(handle) {
                    if task.advance(percent) {
                        debug!("Upload {} at {}%", task.name, percent);
                    }
                }
            })
        };

        match api.upload(&ctx, file, progress).await {
            Ok(hash) => {
                if let Some(task) = queue.lock().find_mut(handle) {
                    task.succeed(hash.clone());
                }
                info!("Uploaded {} (hash {})", name, hash);
                notifier.notify(Notification::info(
                    "File uploaded successfully!",
                    format!("{} has been added to your vault.", name),
                ));
                signal.files_changed();
            }
            Err(e) => {
                let message = e.user_message(UPLOAD_FAILED);
                if let Some(task) = queue.lock().find_mut(handle) {
                    task.fail(message.clone());
                }
                warn!("Upload of {} failed: {}", name, e);
                notifier.notify(Notification::error(
                    UPLOAD_FAILED,
                    format!("{}: {}", name, message),
                ));
            }
        }
    }

    /// Snapshot of all visible tasks in insertion order.
    pub fn tasks(&self) -> Vec<UploadTask> {
        self.queue.lock().tasks.clone()
    }

    pub fn task(&self, handle: UploadHandle) -> Option<UploadTask> {
        self.queue
            .lock()
            .tasks
            .iter()
            .find(|t| t.handle == handle)
            .cloned()
    }

    /// Removes a task from the visible list. An in-flight transfer keeps running.
    pub fn remove(&self, handle: UploadHandle) -> bool {
        let mut queue = self.queue.lock();
        let before = queue.tasks.len();
        queue.tasks.retain(|t| t.handle != handle);
        before != queue.tasks.len()
    }

    pub fn active_count(&self) -> usize {
        self.queue
            .lock()
            .tasks
            .iter()
            .filter(|t| t.status == UploadStatus::Uploading)
            .count()
    }

    /// Waits until every upload started so far has resolved.
    pub async fn wait_idle(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> = std::mem::take(&mut *self.in_flight.lock());
            if pending.is_empty() {
                return;
            }
            for join in pending {
                if let Err(e) = join.await {
                    warn!("Upload task aborted: {}", e);
                }
            }
        }
    }
}
