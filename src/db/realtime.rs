// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Realtime Database client over the REST API.
//!
//! Writes use `PUT /<path>.json`. Subscriptions use the streaming variant of
//! `GET /<path>.json` (`Accept: text/event-stream`) and keep a local mirror of
//! the watched subtree that `put`/`patch` events are applied to.

use super::sse::{SseDecoder, SseEvent};
use super::{SnapshotStore, ValueStream};
use crate::error::AppError;
use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::VecDeque;

/// Realtime Database REST client.
#[derive(Clone)]
pub struct RealtimeDb {
    http: reqwest::Client,
    base_url: String,
    auth: Option<String>,
}

impl RealtimeDb {
    /// Create a client for `database_url` (e.g. `https://<db>.firebaseio.com`).
    pub fn new(database_url: &str, auth: Option<String>) -> Self {
        tracing::info!(url = database_url, "Using Realtime Database store");
        Self {
            http: reqwest::Client::new(),
            base_url: database_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    fn auth_query(&self) -> Vec<(&'static str, String)> {
        self.auth
            .iter()
            .map(|secret| ("auth", secret.clone()))
            .collect()
    }
}

impl SnapshotStore for RealtimeDb {
    fn set<'a>(&'a self, path: &'a str, value: Value) -> BoxFuture<'a, Result<(), AppError>> {
        async move {
            let response = self
                .http
                .put(self.url(path))
                .query(&self.auth_query())
                .json(&value)
                .send()
                .await
                .map_err(|e| AppError::Store(format!("Write request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::Store(format!("HTTP {}: {}", status, body)));
            }

            tracing::debug!(path, "Realtime Database write");
            Ok(())
        }
        .boxed()
    }

    fn subscribe(&self, path: &str) -> ValueStream {
        let request = self
            .http
            .get(self.url(path))
            .header(ACCEPT, "text/event-stream")
            .query(&self.auth_query());

        let state = Subscription {
            request: Some(request),
            body: None,
            decoder: SseDecoder::new(),
            mirror: Value::Null,
            pending: VecDeque::new(),
            done: false,
        };

        stream::unfold(state, |mut sub| async move {
            let item = sub.next_item().await?;
            Some((item, sub))
        })
        .boxed()
    }
}

type Item = Result<Option<Value>, AppError>;

/// State of one streaming subscription.
struct Subscription {
    request: Option<reqwest::RequestBuilder>,
    body: Option<BoxStream<'static, reqwest::Result<Vec<u8>>>>,
    decoder: SseDecoder,
    mirror: Value,
    pending: VecDeque<Item>,
    done: bool,
}

#[derive(Deserialize)]
struct PathData {
    path: String,
    data: Value,
}

impl Subscription {
    async fn next_item(&mut self) -> Option<Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(item);
            }
            if self.done {
                return None;
            }

            if let Some(request) = self.request.take() {
                self.connect(request).await;
                continue;
            }

            let body = self.body.as_mut()?;
            let next = body.next().await;
            match next {
                Some(Ok(chunk)) => {
                    for event in self.decoder.push(&chunk) {
                        self.apply(event);
                    }
                }
                Some(Err(e)) => self.fail(format!("Stream read failed: {}", e)),
                None => self.fail("Stream closed by server".to_string()),
            }
        }
    }

    async fn connect(&mut self, request: reqwest::RequestBuilder) {
        match request.send().await {
            Ok(response) if response.status().is_success() => {
                self.body = Some(
                    response
                        .bytes_stream()
                        .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
                        .boxed(),
                );
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                self.fail(format!("HTTP {}: {}", status, body));
            }
            Err(e) => self.fail(format!("Subscribe request failed: {}", e)),
        }
    }

    fn apply(&mut self, event: SseEvent) {
        match event.event.as_str() {
            "put" | "patch" => {
                let update: PathData = match serde_json::from_str(&event.data) {
                    Ok(update) => update,
                    Err(e) => {
                        self.fail(format!("Malformed {} event: {}", event.event, e));
                        return;
                    }
                };

                if event.event == "put" {
                    set_at_path(&mut self.mirror, &update.path, update.data);
                } else if let Value::Object(children) = update.data {
                    for (key, value) in children {
                        let child = format!("{}/{}", update.path.trim_end_matches('/'), key);
                        set_at_path(&mut self.mirror, &child, value);
                    }
                }

                let current = (!self.mirror.is_null()).then(|| self.mirror.clone());
                self.pending.push_back(Ok(current));
            }
            "keep-alive" => {}
            "cancel" => self.fail("Subscription cancelled by server".to_string()),
            "auth_revoked" => self.fail("Subscription credential revoked".to_string()),
            other => tracing::debug!(event = other, "Ignoring unknown stream event"),
        }
    }

    fn fail(&mut self, message: String) {
        tracing::warn!(error = %message, "Realtime Database subscription failed");
        self.pending.push_back(Err(AppError::Store(message)));
        self.done = true;
        self.body = None;
    }
}

/// Replace the value at a `/`-separated path. `null` deletes.
fn set_at_path(root: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return;
    };

    let mut node = root;
    for segment in parents {
        node = ensure_object(node)
            .entry(segment.to_string())
            .or_insert(Value::Null);
    }

    let map = ensure_object(node);
    if value.is_null() {
        map.remove(*last);
    } else {
        map.insert(last.to_string(), value);
    }
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}
