// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::Stream;
use futures::StreamExt;
use std::time::Duration;
use tokio::time::sleep;

/// Asserts that `stream` neither yields an element nor ends within the
/// given window.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => match item {
            Some(_) => panic!("unexpected element emitted, expected no output"),
            None => panic!("stream ended, expected it to stay open"),
        },
        () = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}
