// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod athlete;
pub mod snapshot;
pub mod units;

pub use athlete::{Athlete, CompetitionResult, PersonalBest};
pub use snapshot::AthleteSnapshot;
pub use units::WeightUnit;
