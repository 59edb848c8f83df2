// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only profile API consumed by the web front-end.
//!
//! Both endpoints render the mounted profile view; neither touches the
//! store or the external API directly.

use crate::services::profile::DisplayOptions;
use crate::services::profile_view::RenderedView;
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use futures_util::stream::{self, Stream};
use std::sync::Arc;

/// Public API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/profile/stream", get(stream_profile))
}

/// Current profile, rendered with the requested display switches.
///
/// `?unit=lbs|kg&raw_only=true|false&show_info=true|false`
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Query(options): Query<DisplayOptions>,
) -> Json<RenderedView> {
    Json(state.profile_view.state().render(&options))
}

/// Server-sent `profile` events: the current state, then one per change.
async fn stream_profile(
    State(state): State<Arc<AppState>>,
    Query(options): Query<DisplayOptions>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let rx = state.profile_view.subscribe();

    let events = stream::unfold((rx, true), move |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let rendered = rx.borrow_and_update().render(&options);
        let event = Event::default().event("profile").json_data(rendered);
        Some((event, (rx, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
