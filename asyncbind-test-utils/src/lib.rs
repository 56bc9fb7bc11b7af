// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Test utilities and fixtures for the asyncbind workspace.
//!
//! Provides a [`RecordingSubscriber`] that captures every signal a bridge
//! delivers, canned async computations in the spirit of "add one after a
//! brief suspension", and assertion helpers for streams. For development and
//! testing only.

pub mod computations;
pub mod helpers;
pub mod recording;

pub use computations::{increase, increase_then_fail, ForeignError, TestError};
pub use helpers::assert_no_element_emitted;
pub use recording::{ReceivedSignal, RecordingSubscriber, SharedRecord, SubscriberRecord};
