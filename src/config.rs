// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! On Cloud Run the API key is injected as an environment variable through a
//! secret binding, so there is no separate Secret Manager lookup here.

use std::env;

/// Default store key for the cached athlete snapshot.
pub const DEFAULT_SNAPSHOT_PATH: &str = "powerlifting/user_data";

/// Environment variable holding the Close Powerlifting bearer credential.
pub const API_KEY_VAR: &str = "CLOSEPOWERLIFTING_API_KEY";

/// How the refresh job gets triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// An external scheduler (Cloud Scheduler) calls `/tasks/refresh`.
    External,
    /// The server runs its own monthly timer.
    Internal,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Close Powerlifting API base URL
    pub closepl_base_url: String,
    /// Close Powerlifting username to look up
    pub closepl_username: String,
    /// Realtime Database URL; `None` selects the in-memory store
    pub database_url: Option<String>,
    /// Store key for the snapshot
    pub snapshot_path: String,
    /// Refresh trigger mode
    pub refresh_mode: RefreshMode,
    /// Day of month for the internal schedule (1-31)
    pub refresh_day_of_month: u32,
    /// Hour (UTC) for the internal schedule
    pub refresh_hour_utc: u32,

    // --- Secrets ---
    /// Close Powerlifting bearer credential. Absence is only an error when
    /// the refresh job actually runs.
    pub closepl_api_key: Option<String>,
    /// Optional Realtime Database auth credential
    pub database_secret: Option<String>,
    /// Optional bearer token accepted on `/tasks/*`
    pub scheduler_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let refresh_day_of_month = parse_or("REFRESH_DAY_OF_MONTH", 1)?;
        if !(1..=31).contains(&refresh_day_of_month) {
            return Err(ConfigError::Invalid("REFRESH_DAY_OF_MONTH"));
        }
        let refresh_hour_utc = parse_or("REFRESH_HOUR_UTC", 2)?;
        if refresh_hour_utc > 23 {
            return Err(ConfigError::Invalid("REFRESH_HOUR_UTC"));
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            closepl_base_url: env::var("CLOSEPOWERLIFTING_BASE_URL")
                .unwrap_or_else(|_| "https://closepowerlifting.com/api".to_string()),
            closepl_username: env::var("CLOSEPOWERLIFTING_USERNAME")
                .unwrap_or_else(|_| "calvinle".to_string()),
            database_url: optional_var("FIREBASE_DATABASE_URL"),
            snapshot_path: env::var("SNAPSHOT_PATH")
                .unwrap_or_else(|_| DEFAULT_SNAPSHOT_PATH.to_string()),
            refresh_mode: match env::var("REFRESH_SCHEDULE").as_deref() {
                Ok("internal") => RefreshMode::Internal,
                _ => RefreshMode::External,
            },
            refresh_day_of_month,
            refresh_hour_utc,

            closepl_api_key: optional_var(API_KEY_VAR),
            database_secret: optional_var("FIREBASE_DATABASE_SECRET"),
            scheduler_token: optional_var("SCHEDULER_TOKEN"),
        })
    }

    /// Deterministic config for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            closepl_base_url: "http://127.0.0.1:9/api".to_string(),
            closepl_username: "testlifter".to_string(),
            database_url: None,
            snapshot_path: DEFAULT_SNAPSHOT_PATH.to_string(),
            refresh_mode: RefreshMode::External,
            refresh_day_of_month: 1,
            refresh_hour_utc: 2,
            closepl_api_key: Some("test_api_key".to_string()),
            database_secret: None,
            scheduler_token: Some("test_scheduler_token".to_string()),
        }
    }
}

/// Read a variable, trimming it; empty values count as unset.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or(name: &'static str, default: u32) -> Result<u32, ConfigError> {
    match optional_var(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
