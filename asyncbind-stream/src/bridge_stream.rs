// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Adapter turning one bridge subscription into a single-shot stream.

use asyncbind_core::{
    AsyncBridge, BoxError, CancellationToken, Completion, Demand, Subscriber, Subscription,
};
use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Subscribes a channel-backed consumer to `bridge` and returns the
/// receiving stream.
///
/// Demand is requested immediately, so the computation launches before this
/// function returns. The stream yields the single value as `Ok`, a declared
/// failure as one `Err` item, and then ends.
pub fn bridge_stream<In, F, Fut, U, E>(bridge: AsyncBridge<In, F>) -> BridgeStream<U, E>
where
    In: Send + 'static,
    F: FnOnce(In, CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Option<U>, BoxError>> + Send + 'static,
    U: Send + 'static,
    E: std::error::Error + Send + 'static,
{
    let (sender, receiver) = mpsc::unbounded_channel();
    let subscription = bridge.subscribe(ChannelSubscriber { sender });

    BridgeStream {
        receiver,
        subscription: Arc::new(subscription),
    }
}

/// Single-shot stream produced by [`bridge_stream`].
///
/// Dropping it cancels the underlying subscription, so abandoning a pipeline
/// mid-flight requests cancellation of the bridged computation.
pub struct BridgeStream<U, E> {
    receiver: mpsc::UnboundedReceiver<Result<U, E>>,
    subscription: Arc<dyn Subscription>,
}

impl<U, E> Stream for BridgeStream<U, E> {
    type Item = Result<U, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl<U, E> Drop for BridgeStream<U, E> {
    fn drop(&mut self) {
        // No-op when the bridge already completed.
        self.subscription.cancel();
    }
}

struct ChannelSubscriber<U, E> {
    sender: mpsc::UnboundedSender<Result<U, E>>,
}

impl<U, E> Subscriber for ChannelSubscriber<U, E>
where
    U: Send + 'static,
    E: std::error::Error + Send + 'static,
{
    type Input = U;
    type Failure = E;

    fn receive_subscription(&mut self, subscription: Arc<dyn Subscription>) {
        // At most one value can ever arrive.
        subscription.request(Demand::Max(1));
    }

    fn receive_value(&mut self, value: Self::Input) -> Demand {
        let _ = self.sender.send(Ok(value));
        Demand::None
    }

    fn receive_completion(&mut self, completion: Completion<Self::Failure>) {
        if let Completion::Failed(error) = completion {
            let _ = self.sender.send(Err(error));
        }
        // The sender drops with this subscriber, which ends the stream.
    }
}
