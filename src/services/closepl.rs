// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Close Powerlifting API client.
//!
//! The response body is treated as opaque JSON: it is cached verbatim and
//! only interpreted when rendering.

use crate::error::AppError;
use serde_json::Value;
use std::time::Duration;

/// Matches the timeout of the scheduled function this replaces.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Close Powerlifting API client.
#[derive(Clone)]
pub struct ClosePowerliftingClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
}

impl ClosePowerliftingClient {
    /// Create a client looking up `username` under `base_url`.
    pub fn new(base_url: &str, username: &str) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Fetch the user's full record (lifter info, personal bests, meets).
    ///
    /// GET {base_url}/users/{username}
    /// Authorization: Bearer {api_key}
    pub async fn fetch_user(&self, api_key: &str) -> Result<Value, AppError> {
        let url = format!("{}/users/{}", self.base_url, self.username);

        let response = self
            .http
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| AppError::UpstreamApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json(&self, response: reqwest::Response) -> Result<Value, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Close Powerlifting rate limit hit (429)");
                return Err(AppError::UpstreamApi(
                    AppError::UPSTREAM_RATE_LIMIT.to_string(),
                ));
            }

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(AppError::UpstreamApi(
                    AppError::UPSTREAM_CREDENTIAL_REJECTED.to_string(),
                ));
            }

            return Err(AppError::UpstreamApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::UpstreamApi(format!("JSON parse error: {}", e)))
    }
}
