// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile view lifecycle against a scripted snapshot stream.

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{self, StreamExt};
use powerlifting_profile::db::{MemoryStore, SnapshotStore, ValueStream};
use powerlifting_profile::error::AppError;
use powerlifting_profile::services::profile_view::NO_DATA_MESSAGE;
use powerlifting_profile::services::{ProfileView, ViewState};
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

mod common;
use common::wait_for_state;

type Item = Result<Option<Value>, AppError>;

/// Store whose subscription is fed by the test.
struct ScriptedStore {
    rx: Mutex<Option<mpsc::UnboundedReceiver<Item>>>,
}

impl ScriptedStore {
    fn new() -> (Self, mpsc::UnboundedSender<Item>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                rx: Mutex::new(Some(rx)),
            },
            tx,
        )
    }
}

impl SnapshotStore for ScriptedStore {
    fn set<'a>(&'a self, _path: &'a str, _value: Value) -> BoxFuture<'a, Result<(), AppError>> {
        async { Ok(()) }.boxed()
    }

    fn subscribe(&self, _path: &str) -> ValueStream {
        let rx = self.rx.lock().unwrap().take().expect("single subscription");
        stream::unfold(rx, |mut rx| async move {
            let item = rx.recv().await?;
            Some((item, rx))
        })
        .boxed()
    }
}

fn athlete_name(state: &ViewState) -> Option<String> {
    match state {
        ViewState::Ready(profile) => profile.athlete.as_ref()?.name.clone(),
        _ => None,
    }
}

#[tokio::test]
async fn test_loading_until_first_delivery() {
    let (store, tx) = ScriptedStore::new();
    let view = ProfileView::mount(&store, "powerlifting/user_data");

    assert_eq!(view.state(), ViewState::Loading);

    tx.send(Ok(Some(common::sample_snapshot()))).unwrap();
    let state = wait_for_state(&view, |s| matches!(s, ViewState::Ready(_))).await;
    assert_eq!(athlete_name(&state).as_deref(), Some("Calvin Le"));
}

#[tokio::test]
async fn test_each_delivery_replaces_state() {
    let (store, tx) = ScriptedStore::new();
    let view = ProfileView::mount(&store, "powerlifting/user_data");

    tx.send(Ok(Some(json!({"data": {"data": [{"name": "First"}]}}))))
        .unwrap();
    wait_for_state(&view, |s| athlete_name(s).as_deref() == Some("First")).await;

    tx.send(Ok(Some(json!({"data": {"data": [{"name": "Second"}]}}))))
        .unwrap();
    wait_for_state(&view, |s| athlete_name(s).as_deref() == Some("Second")).await;

    // A malformed delivery replaces the athlete with an empty one.
    tx.send(Ok(Some(json!({"data": {"data": {}}})))).unwrap();
    let state = wait_for_state(&view, |s| {
        matches!(s, ViewState::Ready(p) if p.athlete.is_none())
    })
    .await;
    assert!(matches!(state, ViewState::Ready(_)));
}

#[tokio::test]
async fn test_absent_record_is_error_but_keeps_listening() {
    let (store, tx) = ScriptedStore::new();
    let view = ProfileView::mount(&store, "powerlifting/user_data");

    tx.send(Ok(None)).unwrap();
    let state = wait_for_state(&view, |s| matches!(s, ViewState::Error(_))).await;
    assert_eq!(state, ViewState::Error(NO_DATA_MESSAGE.to_string()));
    assert!(view.is_listening());

    tx.send(Ok(Some(common::sample_snapshot()))).unwrap();
    wait_for_state(&view, |s| matches!(s, ViewState::Ready(_))).await;
}

#[tokio::test]
async fn test_subscription_error_is_terminal() {
    let (store, tx) = ScriptedStore::new();
    let view = ProfileView::mount(&store, "powerlifting/user_data");

    tx.send(Err(AppError::Store("permission denied".to_string())))
        .unwrap();
    let state = wait_for_state(&view, |s| matches!(s, ViewState::Error(_))).await;
    assert_eq!(
        state,
        ViewState::Error("Store error: permission denied".to_string())
    );

    // The listener has detached: later deliveries go nowhere.
    tokio::time::timeout(Duration::from_secs(2), tx.closed())
        .await
        .expect("listener should drop the subscription");
    assert!(!view.is_listening());
}

#[tokio::test]
async fn test_unmount_releases_subscription() {
    let (store, tx) = ScriptedStore::new();
    let view = ProfileView::mount(&store, "powerlifting/user_data");

    tx.send(Ok(Some(common::sample_snapshot()))).unwrap();
    wait_for_state(&view, |s| matches!(s, ViewState::Ready(_))).await;

    view.unmount();

    tokio::time::timeout(Duration::from_secs(2), tx.closed())
        .await
        .expect("unmount should release the subscription");
}

#[tokio::test]
async fn test_view_follows_memory_store_writes() {
    let store = MemoryStore::new();
    let view = ProfileView::mount(&store, "powerlifting/user_data");

    wait_for_state(&view, |s| matches!(s, ViewState::Error(_))).await;

    store
        .set("powerlifting/user_data", common::sample_snapshot())
        .await
        .unwrap();
    let state = wait_for_state(&view, |s| matches!(s, ViewState::Ready(_))).await;
    assert_eq!(athlete_name(&state).as_deref(), Some("Calvin Le"));
}
