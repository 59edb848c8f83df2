// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Powerlifting profile API server.
//!
//! `powerlifting-profile` serves the profile API (and, with
//! `REFRESH_SCHEDULE=internal`, runs the monthly refresh itself).
//! `powerlifting-profile refresh` runs the refresh job once and exits.

use anyhow::Context;
use powerlifting_profile::{
    config::{Config, RefreshMode},
    services::{spawn_scheduler, MonthlySchedule},
    store_from_config, AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    let store = store_from_config(&config);
    let state = Arc::new(AppState::new(config.clone(), store)?);

    if std::env::args().nth(1).as_deref() == Some("refresh") {
        // Ad hoc run: exit status reports the outcome.
        state.refresh_job.run().await?;
        return Ok(());
    }

    tracing::info!(port = config.port, "Starting powerlifting profile API");

    let scheduler = match config.refresh_mode {
        RefreshMode::Internal => {
            let schedule = MonthlySchedule {
                day_of_month: config.refresh_day_of_month,
                hour_utc: config.refresh_hour_utc,
            };
            tracing::info!(?schedule, "In-process refresh scheduler enabled");
            Some(spawn_scheduler(state.refresh_job.clone(), schedule))
        }
        RefreshMode::External => None,
    };

    // Build router
    let app = powerlifting_profile::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler {
        scheduler
            .stop()
            .await
            .context("Refresh scheduler task failed")?;
    }
    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM (Cloud Run sends SIGTERM before shutdown).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("powerlifting_profile=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
