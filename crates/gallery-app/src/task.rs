use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A spawned task that is cancelled when this guard is dropped.
#[derive(Debug)]
pub(crate) struct BackgroundTask {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl BackgroundTask {
    pub(crate) fn spawn<F, Fut>(body: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let task = tokio::spawn(body(token.clone()));
        Self {
            token,
            task: Some(task),
        }
    }

    /// Idempotent.
    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the task to exit.
    pub(crate) async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                if err.is_panic() {
                    tracing::error!(error = %err, "background task panicked");
                }
            }
        }
    }
}

impl Drop for BackgroundTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
