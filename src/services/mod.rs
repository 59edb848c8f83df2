// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod closepl;
pub mod profile;
pub mod profile_view;
pub mod refresh;
pub mod scheduler;

pub use closepl::ClosePowerliftingClient;
pub use profile::DisplayOptions;
pub use profile_view::{ProfileView, ViewState};
pub use refresh::{RefreshJob, RefreshOutcome};
pub use scheduler::{spawn_scheduler, MonthlySchedule, SchedulerHandle};
