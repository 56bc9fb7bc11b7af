// Copyright 2025 the asyncbind authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Stream operators built on the asyncbind bridge.
//!
//! [`BindAsyncExt::bind_async`] fans one [`asyncbind_core::AsyncBridge`] out
//! per upstream value: each value is fed to an async computation that yields
//! at most one output, and the outputs are merged back into a single stream.

pub mod bind_async;
pub mod bridge_stream;

pub use bind_async::BindAsyncExt;
pub use bridge_stream::{bridge_stream, BridgeStream};
