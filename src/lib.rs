// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Powerlifting profile backend.
//!
//! A scheduled job caches the athlete's Close Powerlifting record in a shared
//! store; a live profile view watches that record and shapes it into the
//! tables shown on the personal site.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{MemoryStore, RealtimeDb, SnapshotStore};
use error::AppError;
use services::{ClosePowerliftingClient, ProfileView, RefreshJob};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn SnapshotStore>,
    pub refresh_job: RefreshJob,
    pub profile_view: ProfileView,
}

impl AppState {
    /// Wire up the job and mount the view over `store`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: Config, store: Arc<dyn SnapshotStore>) -> Result<Self, AppError> {
        let client =
            ClosePowerliftingClient::new(&config.closepl_base_url, &config.closepl_username)?;
        let refresh_job = RefreshJob::new(
            client,
            store.clone(),
            config.closepl_api_key.clone(),
            config.snapshot_path.clone(),
        );
        let profile_view = ProfileView::mount(store.as_ref(), &config.snapshot_path);

        Ok(Self {
            config,
            store,
            refresh_job,
            profile_view,
        })
    }
}

/// Pick the store backend from configuration.
pub fn store_from_config(config: &Config) -> Arc<dyn SnapshotStore> {
    match config.database_url.as_deref() {
        Some(url) => Arc::new(RealtimeDb::new(url, config.database_secret.clone())),
        None => {
            tracing::warn!("FIREBASE_DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    }
}
