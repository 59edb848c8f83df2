// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Refresh job: fetch the athlete record and overwrite the cached snapshot.
//!
//! One network call and at most one store write per run. Any failure is
//! logged and returned so the trigger (scheduler, task route, CLI) records
//! the run as failed. There is no retry.

use crate::config::API_KEY_VAR;
use crate::db::SnapshotStore;
use crate::error::AppError;
use crate::models::AthleteSnapshot;
use crate::services::closepl::ClosePowerliftingClient;
use crate::time_utils::format_utc_rfc3339;
use serde::Serialize;
use std::sync::Arc;

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    pub path: String,
    pub last_updated: String,
}

/// Fetch-and-store job for the athlete snapshot.
#[derive(Clone)]
pub struct RefreshJob {
    client: ClosePowerliftingClient,
    store: Arc<dyn SnapshotStore>,
    api_key: Option<String>,
    path: String,
}

impl RefreshJob {
    pub fn new(
        client: ClosePowerliftingClient,
        store: Arc<dyn SnapshotStore>,
        api_key: Option<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            client,
            store,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            path: path.into(),
        }
    }

    /// Run once.
    pub async fn run(&self) -> Result<RefreshOutcome, AppError> {
        match self.run_inner().await {
            Ok(outcome) => {
                tracing::info!(
                    path = %outcome.path,
                    last_updated = %outcome.last_updated,
                    "Successfully fetched and stored powerlifting data"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    username = %self.client.username(),
                    path = %self.path,
                    "Error fetching powerlifting data"
                );
                Err(e)
            }
        }
    }

    async fn run_inner(&self) -> Result<RefreshOutcome, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::MissingCredential(API_KEY_VAR))?;

        tracing::info!(
            username = %self.client.username(),
            "Fetching powerlifting data from Close Powerlifting API"
        );
        let data = self.client.fetch_user(api_key).await?;

        let snapshot = AthleteSnapshot::new(data, format_utc_rfc3339(chrono::Utc::now()));
        self.store.set(&self.path, snapshot.to_value()).await?;

        Ok(RefreshOutcome {
            path: self.path.clone(),
            last_updated: snapshot.last_updated,
        })
    }
}
