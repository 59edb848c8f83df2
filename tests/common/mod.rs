// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use powerlifting_profile::config::Config;
use powerlifting_profile::db::MemoryStore;
use powerlifting_profile::routes::create_router;
use powerlifting_profile::services::{ProfileView, ViewState};
use powerlifting_profile::AppState;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Raw Close Powerlifting response used across tests.
#[allow(dead_code)]
pub fn sample_payload() -> Value {
    serde_json::from_str(include_str!("../fixtures/closepl_user.json"))
        .expect("fixture should be valid JSON")
}

/// Snapshot as the refresh job would store it.
#[allow(dead_code)]
pub fn sample_snapshot() -> Value {
    serde_json::json!({
        "data": sample_payload(),
        "lastUpdated": "2024-03-01T02:00:00.000Z",
    })
}

/// Create a test app over an in-memory store.
/// `api_base_url` points the refresh job at a mock server.
#[allow(dead_code)]
pub fn create_test_app(
    api_base_url: Option<String>,
) -> (axum::Router, Arc<AppState>, MemoryStore) {
    let mut config = Config::test_default();
    if let Some(url) = api_base_url {
        config.closepl_base_url = url;
    }
    create_test_app_with_config(config)
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>, MemoryStore) {
    let store = MemoryStore::new();
    let state = Arc::new(
        AppState::new(config, Arc::new(store.clone())).expect("Failed to build app state"),
    );
    (create_router(state.clone()), state, store)
}

/// Wait until the view reaches a state matching `pred`.
#[allow(dead_code)]
pub async fn wait_for_state<F>(view: &ProfileView, pred: F) -> ViewState
where
    F: Fn(&ViewState) -> bool,
{
    let mut rx = view.subscribe();
    tokio::time::timeout(Duration::from_secs(2), async move {
        loop {
            let current = rx.borrow_and_update().clone();
            if pred(&current) {
                return current;
            }
            if rx.changed().await.is_err() {
                return rx.borrow().clone();
            }
        }
    })
    .await
    .expect("view did not reach the expected state")
}
