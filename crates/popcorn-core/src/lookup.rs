use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// One spawned remote lookup together with the token that cancels it.
///
/// Dropping the handle cancels the lookup.
pub(crate) struct InFlight {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl InFlight {
    /// Run `lookup` on the runtime and pass its output to `complete`, unless
    /// the token fires first. A cancelled lookup's future is dropped and
    /// `complete` never runs. A lookup that finishes just as it is cancelled
    /// may still complete; callers guard publication with a generation check.
    pub(crate) fn spawn<Fut, F>(lookup: Fut, complete: F) -> Self
    where
        Fut: Future + Send + 'static,
        Fut::Output: Send,
        F: FnOnce(Fut::Output) + Send + 'static,
    {
        let token = CancellationToken::new();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => trace!("lookup cancelled before completion"),
                output = lookup => complete(output),
            }
        });

        Self { token, handle }
    }

    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
