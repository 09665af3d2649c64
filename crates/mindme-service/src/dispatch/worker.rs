//! Single-consumer task queue drained by one dedicated thread.
//!
//! - Tasks run one at a time, in the order they were posted.
//! - `shutdown` discards queued tasks; a task already running finishes.
//! - There is no timeout: a task that never completes stalls the queue.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use mindme_core::error::{ExtensionError, Result};

type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

pub struct SerialWorker {
    tx: Mutex<Option<mpsc::UnboundedSender<Task>>>,
    stopped: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SerialWorker {
    /// Start the worker thread with its own current-thread runtime.
    pub fn spawn(name: &str) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ExtensionError::Internal(format!("worker runtime: {e}")))?;

        let (tx, rx) = mpsc::unbounded_channel::<Task>();
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stopped);
        let thread_name = name.to_string();

        let handle = std::thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || rt.block_on(drain(rx, flag, thread_name)))
            .map_err(|e| ExtensionError::Internal(format!("worker thread: {e}")))?;

        Ok(Self {
            tx: Mutex::new(Some(tx)),
            stopped,
            handle: Mutex::new(Some(handle)),
        })
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Queue a task. Returns `false` once the worker is stopped or gone.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_stopped() {
            return false;
        }
        match lock(&self.tx).as_ref() {
            Some(tx) => tx.send(Box::pin(task)).is_ok(),
            None => false,
        }
    }

    /// Stop accepting work and discard anything still queued.
    ///
    /// Returns the thread handle the first time so callers can wait for an
    /// in-flight task to finish.
    pub fn shutdown(&self) -> Option<JoinHandle<()>> {
        self.stopped.store(true, Ordering::Release);
        lock(&self.tx).take();
        lock(&self.handle).take()
    }
}

impl Drop for SerialWorker {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        lock(&self.tx).take();
    }
}

async fn drain(mut rx: mpsc::UnboundedReceiver<Task>, stopped: Arc<AtomicBool>, name: String) {
    while let Some(task) = rx.recv().await {
        if stopped.load(Ordering::Acquire) {
            let mut discarded = 1;
            while rx.try_recv().is_ok() {
                discarded += 1;
            }
            tracing::debug!(worker = %name, discarded, "worker stopped; pending tasks discarded");
            return;
        }
        task.await;
    }
    tracing::debug!(worker = %name, "worker queue closed");
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned lock only means a panic elsewhere; the Option inside is still usable.
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
