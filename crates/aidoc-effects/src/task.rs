//! Task registry and cancellation for background work.
//!
//! Tracks spawned tasks and supports cooperative shutdown. A task is stopped
//! either by its own cancellation token, by registry shutdown, or by the
//! registry being dropped (handles are aborted).
//!
//! # Blocking Lock Usage
//!
//! Uses `parking_lot::Mutex` for JoinHandle storage because:
//! 1. Operations are O(1) push or O(n) drain
//! 2. Lock is never held across `.await` points
//! 3. No I/O or async work inside lock scope

use std::future::Future;
use std::sync::Arc;

use aidoc_core::effects::CancellationToken;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

// ===== Cancellation =====

/// Owner side of a cancellation flag.
///
/// Tokens handed out by [`CancellationSource::token`] observe the flag; once
/// set it stays set.
#[derive(Debug)]
pub struct CancellationSource {
    tx: watch::Sender<bool>,
}

impl CancellationSource {
    /// Create an un-cancelled source
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// A token observing this source
    pub fn token(&self) -> Arc<dyn CancellationToken> {
        Arc::new(WatchCancellationToken {
            rx: self.tx.subscribe(),
        })
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct WatchCancellationToken {
    rx: watch::Receiver<bool>,
}

#[async_trait::async_trait]
impl CancellationToken for WatchCancellationToken {
    async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            // Sender dropped: nobody can cancel any more, so never resolve.
            if rx.changed().await.is_err() {
                futures::future::pending::<()>().await;
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

// ===== Task Registry =====

/// Registry of spawned background tasks.
#[derive(Debug)]
pub struct TaskRegistry {
    shutdown: CancellationSource,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            shutdown: CancellationSource::new(),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn a task that stops at registry shutdown or when `token` fires,
    /// whichever comes first.
    pub fn spawn_cancellable<F>(&self, fut: F, token: Arc<dyn CancellationToken>)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.shutdown.token();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = token.cancelled() => {}
                _ = fut => {}
            }
        });
        self.track(handle);
    }

    /// Number of tracked tasks that have not finished yet
    pub fn active_count(&self) -> usize {
        let mut handles = self.handles.lock();
        handles.retain(|h| !h.is_finished());
        handles.len()
    }

    /// Signal shutdown and abort every tracked task.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        for handle in self.handles.lock().drain(..) {
            handle.abort();
        }
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut handles = self.handles.lock();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}
