// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A subscriber that records every delivered signal.

use asyncbind_core::{Completion, Demand, Subscriber, Subscription};
use parking_lot::Mutex;
use std::sync::Arc;

/// One signal observed by a [`RecordingSubscriber`], in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceivedSignal<T, E> {
    Value(T),
    Completion(Completion<E>),
}

/// Everything a [`RecordingSubscriber`] has observed so far, shared with the
/// test body.
pub struct SubscriberRecord<T, E> {
    /// All delivered signals, in order.
    pub signals: Vec<ReceivedSignal<T, E>>,
    /// The handle received via `receive_subscription`, if any.
    pub subscription: Option<Arc<dyn Subscription>>,
}

/// Shared handle to a [`SubscriberRecord`].
pub type SharedRecord<T, E> = Arc<Mutex<SubscriberRecord<T, E>>>;

impl<T, E> SubscriberRecord<T, E> {
    fn new() -> Self {
        Self {
            signals: Vec::new(),
            subscription: None,
        }
    }

    /// The delivered values, in order.
    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.signals
            .iter()
            .filter_map(|signal| match signal {
                ReceivedSignal::Value(value) => Some(value.clone()),
                ReceivedSignal::Completion(_) => None,
            })
            .collect()
    }

    /// The delivered terminal signals, in order.
    pub fn completions(&self) -> Vec<Completion<E>>
    where
        E: Clone,
    {
        self.signals
            .iter()
            .filter_map(|signal| match signal {
                ReceivedSignal::Value(_) => None,
                ReceivedSignal::Completion(completion) => Some(completion.clone()),
            })
            .collect()
    }

    /// Returns `true` if no signal of any kind has been delivered.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.signals.is_empty()
    }
}

/// A [`Subscriber`] that records delivered signals into a [`SharedRecord`].
///
/// By default it requests [`Demand::Unlimited`] as soon as it receives its
/// subscription. Use [`with_demand`](RecordingSubscriber::with_demand) to
/// start with a different (possibly empty) demand, and
/// [`requesting_on_value`](RecordingSubscriber::requesting_on_value) to make
/// it request more demand reentrantly from inside the value callback.
pub struct RecordingSubscriber<T, E> {
    record: SharedRecord<T, E>,
    initial_demand: Demand,
    request_on_value: Option<Demand>,
}

impl<T, E> RecordingSubscriber<T, E> {
    pub fn new() -> (Self, SharedRecord<T, E>) {
        Self::with_demand(Demand::Unlimited)
    }

    pub fn with_demand(initial_demand: Demand) -> (Self, SharedRecord<T, E>) {
        let record = Arc::new(Mutex::new(SubscriberRecord::new()));
        (
            Self {
                record: record.clone(),
                initial_demand,
                request_on_value: None,
            },
            record,
        )
    }

    /// Requests the given demand from inside `receive_value`, exercising the
    /// reentrant path.
    #[must_use]
    pub fn requesting_on_value(mut self, demand: Demand) -> Self {
        self.request_on_value = Some(demand);
        self
    }
}

impl<T, E> Subscriber for RecordingSubscriber<T, E>
where
    T: Send + 'static,
    E: std::error::Error + Send + 'static,
{
    type Input = T;
    type Failure = E;

    fn receive_subscription(&mut self, subscription: Arc<dyn Subscription>) {
        self.record.lock().subscription = Some(subscription.clone());
        if !self.initial_demand.is_none() {
            subscription.request(self.initial_demand);
        }
    }

    fn receive_value(&mut self, value: Self::Input) -> Demand {
        self.record.lock().signals.push(ReceivedSignal::Value(value));
        if let Some(demand) = self.request_on_value {
            let subscription = self.record.lock().subscription.clone();
            if let Some(subscription) = subscription {
                // Reentrant: called synchronously from within delivery.
                subscription.request(demand);
            }
        }
        Demand::None
    }

    fn receive_completion(&mut self, completion: Completion<Self::Failure>) {
        self.record
            .lock()
            .signals
            .push(ReceivedSignal::Completion(completion));
    }
}
