//! Shutdown coordination for background tasks.

use std::future::Future;

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that long-running tasks subscribe to, and
/// keeps their join handles so that [`Shutdown::shutdown`] can wait for every
/// task to acknowledge the signal by exiting.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
    /// Tasks spawned through this coordinator.
    tasks: Vec<JoinHandle<()>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            tasks: Vec::new(),
        }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Spawn `task` on `runtime`, handing it a fresh subscription.
    ///
    /// The subscription is created before spawning, so a trigger that races
    /// the task's first poll is not lost.
    pub fn spawn<F, Fut>(&mut self, runtime: &Handle, task: F)
    where
        F: FnOnce(broadcast::Receiver<()>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let rx = self.subscribe();
        self.tasks.push(runtime.spawn(task(rx)));
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Trigger the signal and wait for every spawned task to finish.
    pub async fn shutdown(&mut self) {
        self.trigger();
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                if e.is_panic() {
                    tracing::error!(error = %e, "background task panicked before shutdown");
                }
            }
        }
    }

    /// Whether any spawned task has not yet finished.
    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|t| !t.is_finished())
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_shutdown_waits_for_tasks() {
        let mut shutdown = Shutdown::new();
        let exited = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&exited);
        shutdown.spawn(&Handle::current(), move |mut rx| async move {
            let _ = rx.recv().await;
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            flag.store(true, Ordering::SeqCst);
        });
        assert!(shutdown.is_running());

        shutdown.shutdown().await;
        assert!(exited.load(Ordering::SeqCst));
        assert!(!shutdown.is_running());
        assert_eq!(shutdown.tx.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let mut shutdown = Shutdown::new();
        shutdown.shutdown().await;
        shutdown.shutdown().await;
        assert!(!shutdown.is_running());
    }
}
