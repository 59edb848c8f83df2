// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local store used for tests and local development.

use super::{SnapshotStore, ValueStream};
use crate::error::AppError;
use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// In-memory store backed by one watch channel per key.
#[derive(Clone, Default)]
pub struct MemoryStore {
    channels: Arc<Mutex<HashMap<String, watch::Sender<Option<Value>>>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value at `path`.
    pub fn get(&self, path: &str) -> Option<Value> {
        self.sender(path).borrow().clone()
    }

    /// Number of successful `set` calls across all keys.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn sender(&self, path: &str) -> watch::Sender<Option<Value>> {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels
            .entry(normalize(path))
            .or_insert_with(|| watch::channel(None).0)
            .clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn set<'a>(&'a self, path: &'a str, value: Value) -> BoxFuture<'a, Result<(), AppError>> {
        async move {
            self.sender(path).send_replace(Some(value));
            self.writes.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(path, "Memory store write");
            Ok(())
        }
        .boxed()
    }

    fn subscribe(&self, path: &str) -> ValueStream {
        let rx = self.sender(path).subscribe();

        stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            let value = rx.borrow_and_update().clone();
            Some((Ok(value), (rx, false)))
        })
        .boxed()
    }
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_subscribe_yields_current_then_changes() {
        let store = MemoryStore::new();
        let mut values = store.subscribe("powerlifting/user_data");

        assert_eq!(values.next().await.unwrap().unwrap(), None);

        store
            .set("/powerlifting/user_data/", json!({"a": 1}))
            .await
            .unwrap();
        assert_eq!(values.next().await.unwrap().unwrap(), Some(json!({"a": 1})));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_set_overwrites_without_merge() {
        let store = MemoryStore::new();
        store.set("k", json!({"a": 1, "b": 2})).await.unwrap();
        store.set("k", json!({"c": 3})).await.unwrap();

        assert_eq!(store.get("k"), Some(json!({"c": 3})));
    }
}
