// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::bridge_stream::bridge_stream;
use asyncbind_core::{AsyncBridge, BoxError, CancellationToken};
use futures::{Stream, StreamExt};
use std::future::Future;

/// Extension trait fanning an async, fallible, optional-result computation
/// out over every stream value.
pub trait BindAsyncExt: Stream + Sized {
    /// Runs `computation` once per upstream value and merges the results.
    ///
    /// Each upstream value is captured by its own bridge; the computation
    /// receives the value and a [`CancellationToken`] it should observe at
    /// its suspension points. Per value the output carries:
    ///
    /// - one `Ok(output)` item if the computation returns `Ok(Some(output))`
    /// - nothing if it returns `Ok(None)` (the value is filtered out)
    /// - one `Err(error)` item if it fails
    ///
    /// Errors flow as items; they do not tear down the outer stream.
    /// Computations for distinct upstream values run concurrently without
    /// limit, so output ordering across values is not guaranteed; use
    /// [`bind_async_with_limit`](BindAsyncExt::bind_async_with_limit) with a
    /// limit of 1 for sequential, ordered processing.
    ///
    /// Dropping the returned stream requests cancellation of every in-flight
    /// computation.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use asyncbind_stream::BindAsyncExt;
    /// use futures::{stream, StreamExt};
    ///
    /// # async fn example() {
    /// let results: Vec<Result<i32, std::io::Error>> = stream::iter(vec![1, 2, 3])
    ///     .bind_async(|value, _token| async move { Ok(Some(value + 1)) })
    ///     .collect()
    ///     .await;
    /// # }
    /// ```
    fn bind_async<F, Fut, U, E>(self, computation: F) -> impl Stream<Item = Result<U, E>>
    where
        Self::Item: Send + 'static,
        F: Fn(Self::Item, CancellationToken) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<U>, E>> + Send + 'static,
        U: Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.bind_async_with_limit(None, computation)
    }

    /// Like [`bind_async`](BindAsyncExt::bind_async), but with at most
    /// `limit` computations in flight at once.
    ///
    /// `None` means no limit.
    fn bind_async_with_limit<F, Fut, U, E>(
        self,
        limit: impl Into<Option<usize>>,
        computation: F,
    ) -> impl Stream<Item = Result<U, E>>
    where
        Self::Item: Send + 'static,
        F: Fn(Self::Item, CancellationToken) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<U>, E>> + Send + 'static,
        U: Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.flat_map_unordered(limit, move |input| {
            let computation = computation.clone();
            // The typed failure is boxed here and recovered by the bridge's
            // declared-failure narrowing on delivery.
            bridge_stream(AsyncBridge::new(input, move |value, token| {
                let work = computation(value, token);
                async move { work.await.map_err(|error| Box::new(error) as BoxError) }
            }))
        })
    }
}

impl<S> BindAsyncExt for S where S: Stream + Sized {}
