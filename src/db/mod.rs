// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared store: one key written by the refresh job, watched by the profile
//! view.

pub mod memory;
pub mod realtime;
pub mod sse;

pub use memory::MemoryStore;
pub use realtime::RealtimeDb;

use crate::error::AppError;
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use serde_json::Value;

/// Live value stream for one key.
///
/// The first item is the current value (`None` when nothing is stored), then
/// one item per change. An `Err` item ends the stream. Dropping the stream
/// releases the subscription.
pub type ValueStream = BoxStream<'static, Result<Option<Value>, AppError>>;

/// Subscribe-to-key / overwrite-key capability.
pub trait SnapshotStore: Send + Sync {
    /// Overwrite the value at `path`. No merge with the previous value.
    fn set<'a>(&'a self, path: &'a str, value: Value) -> BoxFuture<'a, Result<(), AppError>>;

    /// Watch the value at `path`.
    fn subscribe(&self, path: &str) -> ValueStream;
}
