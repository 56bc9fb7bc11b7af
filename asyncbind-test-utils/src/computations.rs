// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Canned async computations and error fixtures.

use std::time::Duration;
use tokio::time::sleep;

/// Declared failure type used across the test-suites.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TestError {
    message: String,
}

impl TestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for TestError {
    fn default() -> Self {
        Self::new("failed")
    }
}

/// An error type deliberately matching no subscriber's declared failure.
#[derive(Debug, thiserror::Error)]
#[error("foreign error: {0}")]
pub struct ForeignError(pub String);

/// Adds one after a brief suspension.
pub async fn increase(value: i32) -> Result<i32, TestError> {
    sleep(Duration::from_millis(1)).await;
    Ok(value + 1)
}

/// Suspends briefly, then fails with [`TestError`].
pub async fn increase_then_fail(value: i32) -> Result<i32, TestError> {
    sleep(Duration::from_millis(1)).await;
    Err(TestError::new(format!("failed to increase {value}")))
}
