// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The downstream side of the push-based protocol.

use crate::{Completion, Demand};
use std::sync::Arc;

/// The live link between a bridge and one subscriber.
///
/// Both operations may be called from arbitrary threads, repeatedly, and
/// reentrantly from within the subscriber's own callbacks. Neither ever
/// blocks on the in-flight computation.
pub trait Subscription: Send + Sync {
    /// Signals readiness to receive values.
    ///
    /// The first non-empty demand launches the bridged computation; every
    /// later call is a no-op. Empty demand ([`Demand::is_none`]) never
    /// launches. Failures never surface here; they arrive later as a
    /// [`Completion::Failed`].
    fn request(&self, demand: Demand);

    /// Abandons the subscription.
    ///
    /// Requests cooperative cancellation of the running computation and
    /// releases the subscriber. Cancellation is observed by the delivery
    /// path: a delivery that already started when this is called may still
    /// hand over one signal, but once the cancellation is observed nothing
    /// further reaches the subscriber, even if the computation later
    /// settles. Idempotent.
    fn cancel(&self);
}

/// A consumer of at most one value followed by exactly one terminal signal.
///
/// The bridge calls [`receive_subscription`](Subscriber::receive_subscription)
/// synchronously while subscribing, then later
/// [`receive_value`](Subscriber::receive_value) at most once and
/// [`receive_completion`](Subscriber::receive_completion) at most once, in
/// that order. Nothing is delivered after cancellation.
pub trait Subscriber: Send + 'static {
    /// The value type this subscriber accepts.
    type Input: Send + 'static;

    /// The failure type this subscriber expects.
    ///
    /// Only computation errors that downcast to this type propagate as
    /// [`Completion::Failed`]; any other error is treated as a normal finish.
    type Failure: std::error::Error + Send + 'static;

    /// Hands over the subscription handle. The subscriber may request demand
    /// (or cancel) from inside this call.
    fn receive_subscription(&mut self, subscription: Arc<dyn Subscription>);

    /// Delivers the single value. The returned demand adjustment is advisory
    /// and ignored by the bridge, which never emits a second value.
    fn receive_value(&mut self, value: Self::Input) -> Demand;

    /// Delivers the terminal signal.
    fn receive_completion(&mut self, completion: Completion<Self::Failure>);
}
