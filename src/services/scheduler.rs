// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process monthly trigger for the refresh job.
//!
//! Used when no external scheduler is configured. Runs are serial: the next
//! sleep starts only after the previous run has finished.

use crate::services::refresh::RefreshJob;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use std::future::Future;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Fires once a month at `day_of_month` `hour_utc`:00 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlySchedule {
    pub day_of_month: u32,
    pub hour_utc: u32,
}

impl Default for MonthlySchedule {
    /// `0 2 1 * *`
    fn default() -> Self {
        Self {
            day_of_month: 1,
            hour_utc: 2,
        }
    }
}

impl MonthlySchedule {
    /// First fire time strictly after `now`. Days past the end of a month
    /// clamp to its last day.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let (mut year, mut month) = (now.year(), now.month());
        loop {
            if let Some(candidate) = self.fire_time(year, month) {
                if candidate > now {
                    return candidate;
                }
            }
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
        }
    }

    fn fire_time(&self, year: i32, month: u32) -> Option<DateTime<Utc>> {
        let day = self.day_of_month.clamp(1, days_in_month(year, month));
        let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(self.hour_utc, 0, 0)?;
        Some(Utc.from_utc_datetime(&naive))
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Handle to the running scheduler task.
pub struct SchedulerHandle {
    cancel_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop the scheduler and wait for it to exit.
    pub async fn stop(self) -> Result<(), tokio::task::JoinError> {
        let _ = self.cancel_tx.send(());
        self.join.await
    }
}

/// Spawn the monthly loop running the refresh job.
pub fn spawn_scheduler(job: RefreshJob, schedule: MonthlySchedule) -> SchedulerHandle {
    spawn_monthly(schedule, move || {
        let job = job.clone();
        async move {
            // Failures are logged by the job; the next month tries again.
            let _ = job.run().await;
        }
    })
}

/// Spawn the monthly loop around any task. Each run is awaited before the
/// next fire time is computed.
pub fn spawn_monthly<F, Fut>(schedule: MonthlySchedule, mut task: F) -> SchedulerHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (cancel_tx, mut cancel_rx) = oneshot::channel();

    let join = tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let next = schedule.next_after(now);
            let wait = (next - now).max(Duration::zero());
            tracing::info!(next_run = %next, "Next scheduled powerlifting refresh");

            tokio::select! {
                _ = &mut cancel_rx => {
                    tracing::info!("Refresh scheduler shutdown requested");
                    break;
                }
                _ = tokio::time::sleep(wait.to_std().unwrap_or_default()) => {
                    task().await;
                }
            }
        }
    });

    SchedulerHandle { cancel_tx, join }
}
