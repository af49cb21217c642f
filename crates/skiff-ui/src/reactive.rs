//! Task lifetime helpers shared by every view-model.

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owns the tasks backing a view-model and aborts them when dropped.
#[derive(Default)]
pub struct DisposeBag {
    tasks: Vec<JoinHandle<()>>,
}

impl DisposeBag {
    /// Empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Spawn `future` on the current runtime and tie it to the bag.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.push(tokio::spawn(future));
    }

    /// Number of tasks still running.
    #[must_use]
    pub fn active(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }
}

impl Drop for DisposeBag {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Wait for the next change on `receiver`; once the sender is gone, wait forever.
///
/// Lets `select!` loops keep serving their other inputs after one upstream closes.
pub async fn changed_or_pending<T>(receiver: &mut watch::Receiver<T>) {
    if receiver.changed().await.is_err() {
        std::future::pending::<()>().await;
    }
}
