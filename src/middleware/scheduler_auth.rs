// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Guard for `/tasks/*` routes, which only the scheduler should call.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Header Cloud Scheduler adds to HTTP target requests.
pub const CLOUD_SCHEDULER_HEADER: &str = "x-cloudscheduler";

/// With `SCHEDULER_TOKEN` configured, require `Authorization: Bearer <token>`.
/// Without it, require the Cloud Scheduler marker header and rely on the
/// Cloud Run invoker policy for the rest.
pub async fn require_scheduler_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let allowed = match state.config.scheduler_token.as_deref() {
        Some(expected) => bearer_matches(request.headers(), expected),
        None => request
            .headers()
            .get(CLOUD_SCHEDULER_HEADER)
            .and_then(|h| h.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("true")),
    };

    if !allowed {
        tracing::warn!(
            uri = %request.uri(),
            "Blocked tasks request without scheduler credentials"
        );
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

fn bearer_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| bool::from(token.as_bytes().ct_eq(expected.as_bytes())))
}
