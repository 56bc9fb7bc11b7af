// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Task spawning with cooperative cancellation.

use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Handle to a spawned background task with cancellation on drop.
///
/// The spawned future receives a [`CancellationToken`] that is signalled when
/// the handle is dropped or [`cancel`](BridgeTask::cancel)led. Cancellation is
/// cooperative: the task must observe the token at its own suspension points
/// and unwind; nothing is forcibly interrupted.
#[derive(Debug)]
pub struct BridgeTask {
    cancel: CancellationToken,
}

impl BridgeTask {
    /// Spawns a background task on the current tokio runtime.
    ///
    /// The closure receives the token owned by the returned handle and must
    /// produce the future to run.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, as `tokio::spawn` does.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let future = f(cancel.clone());
        // Detached on purpose: completion is signalled through shared state,
        // never by joining.
        let _ = tokio::spawn(future);

        Self { cancel }
    }

    /// Signals the task to stop without waiting for it to complete.
    ///
    /// Idempotent: calling this more than once has no additional effect.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for BridgeTask {
    fn drop(&mut self) {
        // Signal cancellation to allow graceful shutdown
        self.cancel.cancel();
    }
}
