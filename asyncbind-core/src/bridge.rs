// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The bridge between one async computation and one subscription.

use crate::bridge_task::BridgeTask;
use crate::completion::Completion;
use crate::demand::Demand;
use crate::subscriber::{Subscriber, Subscription};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio_util::sync::CancellationToken;

/// Error type accepted from computations before the declared-failure
/// narrowing is applied.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One input value paired with one async computation over it.
///
/// Subscribing adapts the computation into the subscription protocol: on the
/// first demand the computation is launched exactly once, and its outcome is
/// forwarded as at most one value signal followed by exactly one terminal
/// signal, unless the subscription is cancelled first.
///
/// The computation receives a [`CancellationToken`] and is expected to
/// observe it at its own suspension points; the bridge only guarantees that
/// nothing is *delivered* once the delivery path has observed cancellation,
/// not that the computation stops instantly.
pub struct AsyncBridge<In, F> {
    input: In,
    computation: F,
}

impl<In, F> AsyncBridge<In, F> {
    /// Captures the input and the computation. Nothing runs until demand is
    /// requested on the subscription.
    pub fn new(input: In, computation: F) -> Self {
        Self { input, computation }
    }

    /// Subscribes a consumer, handing it the subscription handle
    /// synchronously via [`Subscriber::receive_subscription`].
    ///
    /// The returned handle is a clone of the one given to the subscriber;
    /// either can be used to request demand or cancel.
    pub fn subscribe<S, Fut>(self, mut subscriber: S) -> BridgeSubscription<In, F, S>
    where
        In: Send + 'static,
        F: FnOnce(In, CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Option<S::Input>, BoxError>> + Send + 'static,
        S: Subscriber,
    {
        let inner = Arc::new(BridgeInner {
            seed: Mutex::new(Some(Seed {
                input: self.input,
                computation: self.computation,
            })),
            downstream: Mutex::new(None),
            task: Mutex::new(None),
            cancelled: AtomicBool::new(false),
            committed: AtomicBool::new(false),
            pending_demand: AtomicBool::new(false),
        });
        let subscription = BridgeSubscription { inner };

        // The subscriber gets its handle before being stored, so that no
        // lock is held while it runs arbitrary code here. Demand it requests
        // during this call is parked and honored right after commit.
        subscriber.receive_subscription(Arc::new(subscription.clone()));

        {
            let mut slot = subscription.inner.downstream.lock();
            if !subscription.inner.cancelled.load(Ordering::SeqCst) {
                *slot = Some(subscriber);
            }
        }
        subscription.inner.committed.store(true, Ordering::SeqCst);
        if subscription.inner.pending_demand.load(Ordering::SeqCst) {
            launch(&subscription.inner);
        }

        subscription
    }
}

struct Seed<In, F> {
    input: In,
    computation: F,
}

struct BridgeInner<In, F, S> {
    /// Input and computation, present until the single launch (or a cancel
    /// that precedes it) consumes them. Absence means "launched or dead".
    seed: Mutex<Option<Seed<In, F>>>,
    /// The consumer, present until cancellation or terminal delivery takes
    /// it out. Absence suppresses all further signalling.
    downstream: Mutex<Option<S>>,
    /// Cancellable handle to the in-flight computation.
    task: Mutex<Option<BridgeTask>>,
    cancelled: AtomicBool,
    /// Set once the subscriber has been stored; demand requested before that
    /// (from inside `receive_subscription`) only sets `pending_demand`.
    committed: AtomicBool,
    pending_demand: AtomicBool,
}

/// Subscription handle produced by [`AsyncBridge::subscribe`].
pub struct BridgeSubscription<In, F, S> {
    inner: Arc<BridgeInner<In, F, S>>,
}

impl<In, F, S> Clone for BridgeSubscription<In, F, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<In, F, S> BridgeSubscription<In, F, S> {
    /// Returns `true` once [`cancel`](Subscription::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}

impl<In, F, Fut, S> Subscription for BridgeSubscription<In, F, S>
where
    In: Send + 'static,
    F: FnOnce(In, CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Option<S::Input>, BoxError>> + Send + 'static,
    S: Subscriber,
{
    fn request(&self, demand: Demand) {
        if demand.is_none() {
            return;
        }
        self.inner.pending_demand.store(true, Ordering::SeqCst);
        if self.inner.committed.load(Ordering::SeqCst) {
            launch(&self.inner);
        }
    }

    fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.seed.lock().take();
        if let Some(task) = self.inner.task.lock().take() {
            task.cancel();
        }
        self.inner.downstream.lock().take();
    }
}

/// Launches the computation if the seed is still present. Safe to call from
/// racing threads; the seed take is the exactly-once gate.
fn launch<In, F, Fut, S>(inner: &Arc<BridgeInner<In, F, S>>)
where
    In: Send + 'static,
    F: FnOnce(In, CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Option<S::Input>, BoxError>> + Send + 'static,
    S: Subscriber,
{
    let Some(seed) = inner.seed.lock().take() else {
        return;
    };

    // The task only carries a weak back-reference: the subscription owns the
    // task handle, never the other way around.
    let weak = Arc::downgrade(inner);
    let task = BridgeTask::spawn(move |token| {
        let work = (seed.computation)(seed.input, token);
        run_and_settle(weak, work)
    });
    *inner.task.lock() = Some(task);

    // A cancel() that ran between the seed take and the store above missed
    // the fresh handle; re-check so its token still gets signalled.
    if inner.cancelled.load(Ordering::SeqCst) {
        if let Some(task) = inner.task.lock().take() {
            task.cancel();
        }
    }
}

/// Awaits the computation and forwards its outcome downstream.
///
/// Every delivery step re-checks that the subscription has not been
/// cancelled; the consumer callbacks run with no internal lock held, so they
/// may reenter `request` or `cancel` on the same subscription.
async fn run_and_settle<In, F, Fut, S>(inner: Weak<BridgeInner<In, F, S>>, work: Fut)
where
    S: Subscriber,
    Fut: Future<Output = Result<Option<S::Input>, BoxError>>,
{
    let settled = Settled::<S::Input, S::Failure>::from_result(work.await);

    let Some(inner) = inner.upgrade() else {
        return;
    };
    // The computation has settled; release its handle instead of letting it
    // linger until the subscription drops.
    inner.task.lock().take();
    if inner.cancelled.load(Ordering::SeqCst) {
        return;
    }
    let Some(mut downstream) = inner.downstream.lock().take() else {
        return;
    };

    match settled {
        Settled::Value(value) => {
            // Single-shot: the returned demand adjustment has nothing left
            // to pull.
            let _ = downstream.receive_value(value);
            if inner.cancelled.load(Ordering::SeqCst) {
                return;
            }
            downstream.receive_completion(Completion::Finished);
        }
        Settled::Empty => downstream.receive_completion(Completion::Finished),
        Settled::Failed(failure) => downstream.receive_completion(Completion::Failed(failure)),
    }
}

/// Terminal outcome of a computation, after the declared-failure narrowing.
enum Settled<T, E> {
    Value(T),
    /// Legitimately produced nothing; not an error.
    Empty,
    Failed(E),
}

impl<T, E> Settled<T, E>
where
    E: std::error::Error + Send + 'static,
{
    fn from_result(result: Result<Option<T>, BoxError>) -> Self {
        match result {
            Ok(Some(value)) => Self::Value(value),
            Ok(None) => Self::Empty,
            Err(error) => match error.downcast::<E>() {
                Ok(failure) => Self::Failed(*failure),
                Err(foreign) => {
                    // Only errors of the declared failure type propagate;
                    // anything else (cancellation-shaped errors included)
                    // finishes normally.
                    crate::warn!(
                        "bridged computation failed with an undeclared error type, \
                         treating as a normal finish: {}",
                        foreign
                    );
                    Self::Empty
                }
            },
        }
    }
}
