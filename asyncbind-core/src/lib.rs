// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core primitive for bridging a push-based subscription protocol with a
//! one-shot, cancellable async computation.
//!
//! The entry point is [`AsyncBridge`]: it captures one input value and one
//! async computation, and on subscription adapts that computation into the
//! demand/value/completion protocol defined by [`Subscriber`] and
//! [`Subscription`]. The bridge is strictly single-shot: at most one value
//! signal, then exactly one terminal signal, unless cancelled first.
//!
//! # Example
//!
//! ```no_run
//! use asyncbind_core::{AsyncBridge, BoxError, Subscriber};
//!
//! # async fn example<S: Subscriber<Input = i32>>(subscriber: S) {
//! let bridge = AsyncBridge::new(1, |input: i32, _token| async move {
//!     Ok::<_, BoxError>(Some(input + 1))
//! });
//! let subscription = bridge.subscribe(subscriber);
//! # drop(subscription);
//! # }
//! ```

pub mod bridge;
pub mod bridge_task;
pub mod completion;
pub mod demand;
mod logging;
pub mod subscriber;

pub use bridge::{AsyncBridge, BoxError, BridgeSubscription};
pub use bridge_task::BridgeTask;
pub use completion::Completion;
pub use demand::Demand;
pub use subscriber::{Subscriber, Subscription};

// Re-exported so computations can name the token type without depending on
// tokio-util directly.
pub use tokio_util::sync::CancellationToken;
