// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Task routes called by the scheduler, not by visitors.
//!
//! Cloud Scheduler runs `POST /tasks/refresh` on `0 2 1 * *` (02:00 UTC on
//! the 1st of each month). A non-2xx response marks the run as failed in
//! the scheduler; nothing here retries.

use crate::error::Result;
use crate::services::RefreshOutcome;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

/// Task handler routes (called by the scheduler).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tasks/refresh", post(refresh))
}

/// Fetch the athlete record and overwrite the snapshot.
async fn refresh(State(state): State<Arc<AppState>>) -> Result<Json<RefreshOutcome>> {
    tracing::info!("Refresh triggered by scheduler");
    let outcome = state.refresh_job.run().await?;
    Ok(Json(outcome))
}
