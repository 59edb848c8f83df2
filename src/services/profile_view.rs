// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Live profile view: one store subscription per mounted view.
//!
//! `mount` attaches a listener to the snapshot key and publishes a
//! [`ViewState`] on every delivery; each delivery fully replaces the derived
//! state. Dropping the view aborts the listener, so no update is applied to
//! a view that has been torn down.

use crate::db::SnapshotStore;
use crate::services::profile::{render, DisplayOptions, ProfileData, RenderedProfile};
use futures_util::StreamExt;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Message shown when nothing is stored at the key.
pub const NO_DATA_MESSAGE: &str = "No data found.";

/// Lifecycle of a mounted view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Nothing received from the store yet
    Loading,
    /// Latest snapshot, already shaped
    Ready(ProfileData),
    /// Store failure or empty key, as user-facing text
    Error(String),
}

impl ViewState {
    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Ready(_) => "ready",
            ViewState::Error(_) => "error",
        }
    }

    /// Render for the page with the given display switches.
    pub fn render(&self, options: &DisplayOptions) -> RenderedView {
        match self {
            ViewState::Loading => RenderedView::Loading,
            ViewState::Ready(profile) => RenderedView::Ready(render(profile, options)),
            ViewState::Error(message) => RenderedView::Error {
                message: message.clone(),
            },
        }
    }
}

/// Serialized view state sent to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RenderedView {
    Loading,
    Ready(RenderedProfile),
    Error { message: String },
}

/// A mounted profile view.
pub struct ProfileView {
    state: watch::Receiver<ViewState>,
    listener: JoinHandle<()>,
}

impl ProfileView {
    /// Subscribe to `path` and start listening. Must be called inside a
    /// tokio runtime.
    pub fn mount(store: &dyn SnapshotStore, path: &str) -> Self {
        let (tx, rx) = watch::channel(ViewState::Loading);
        let mut values = store.subscribe(path);
        let path = path.to_string();

        let listener = tokio::spawn(async move {
            while let Some(item) = values.next().await {
                let (next, stop) = match item {
                    Ok(Some(value)) => (ViewState::Ready(ProfileData::from_value(&value)), false),
                    Ok(None) => {
                        tracing::warn!(path = %path, "No snapshot stored");
                        (ViewState::Error(NO_DATA_MESSAGE.to_string()), false)
                    }
                    Err(e) => {
                        tracing::error!(path = %path, error = %e, "Snapshot subscription failed");
                        (ViewState::Error(e.to_string()), true)
                    }
                };

                tracing::debug!(path = %path, state = next.label(), "Profile view updated");
                if tx.send(next).is_err() || stop {
                    break;
                }
            }
        });

        Self {
            state: rx,
            listener,
        }
    }

    /// Current state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Detach the listener. Same as dropping the view.
    pub fn unmount(self) {}

    /// Whether the listener is still attached to the store.
    pub fn is_listening(&self) -> bool {
        !self.listener.is_finished()
    }
}

impl Drop for ProfileView {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
