// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shapes the cached snapshot into display rows.
//!
//! Nothing here fails: a snapshot of the wrong shape renders as an empty
//! profile, and unusable figures render as the placeholder dash.

use crate::models::units::PLACEHOLDER;
use crate::models::{Athlete, CompetitionResult, PersonalBest, WeightUnit};
use crate::time_utils::parse_calendar_date;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Meets before this year belong to a different lifter with the same name
/// upstream and are hidden.
pub const COMPETITION_CUTOFF_YEAR: i32 = 2018;

/// Data derived from one snapshot delivery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileData {
    /// `None` when `data.data[0]` is missing or not an object
    pub athlete: Option<Athlete>,
    pub last_updated: Option<String>,
}

impl ProfileData {
    pub fn from_value(snapshot: &Value) -> Self {
        Self {
            athlete: extract_athlete(snapshot),
            last_updated: snapshot
                .get("lastUpdated")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

/// Take the athlete at `data.data[0]`.
///
/// If `data.data` is anything but a non-empty array the athlete is absent.
pub fn extract_athlete(snapshot: &Value) -> Option<Athlete> {
    let first = snapshot.get("data")?.get("data")?.as_array()?.first()?;
    first.is_object().then(|| Athlete::from_value(first))
}

/// Parsed meet date; unparseable dates count as 1970-01-01.
pub fn competition_date(result: &CompetitionResult) -> NaiveDate {
    result
        .date
        .as_deref()
        .and_then(parse_calendar_date)
        .unwrap_or_default()
}

/// Meets dated in or after `cutoff_year`, most recent first.
pub fn recent_competitions(
    results: &[CompetitionResult],
    cutoff_year: i32,
) -> Vec<&CompetitionResult> {
    let mut kept: Vec<(NaiveDate, &CompetitionResult)> = results
        .iter()
        .map(|result| (competition_date(result), result))
        .filter(|(date, _)| date.year() >= cutoff_year)
        .collect();

    kept.sort_by(|a, b| b.0.cmp(&a.0));
    kept.into_iter().map(|(_, result)| result).collect()
}

/// Reported total, or squat + bench + deadlift when the total is missing or
/// blank.
///
/// A reported total that is not a number (e.g. `"DQ"`) is `None`, never the
/// sum. Non-numeric lifts count as zero; a zero sum is `None`.
pub fn competition_total(result: &CompetitionResult) -> Option<f64> {
    if result.reported_total.is_some() {
        return result.total;
    }

    let sum = result.squat.unwrap_or(0.0)
        + result.bench.unwrap_or(0.0)
        + result.deadlift.unwrap_or(0.0);
    (sum != 0.0).then_some(sum)
}

/// Personal bests shown in the primary table.
pub fn visible_personal_bests(bests: &[PersonalBest], raw_only: bool) -> Vec<&PersonalBest> {
    bests.iter().filter(|pb| !raw_only || pb.is_raw()).collect()
}

// ─── Rendering ───────────────────────────────────────────────

/// Display switches for the profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub unit: WeightUnit,
    /// Only show personal bests tagged as raw
    pub raw_only: bool,
    /// Include the summary block
    pub show_info: bool,
    #[serde(skip, default = "default_cutoff_year")]
    pub cutoff_year: i32,
}

fn default_cutoff_year() -> i32 {
    COMPETITION_CUTOFF_YEAR
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            unit: WeightUnit::Lbs,
            raw_only: true,
            show_info: true,
            cutoff_year: COMPETITION_CUTOFF_YEAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PersonalBestRow {
    pub squat: String,
    pub bench: String,
    pub deadlift: String,
    pub total: String,
    pub equip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CompetitionRow {
    pub competition: String,
    pub date: String,
    pub location: String,
    pub federation: Option<String>,
    pub place: Option<String>,
    pub squat: String,
    pub bench: String,
    pub deadlift: String,
    pub total: String,
    pub dots: String,
}

/// Summary block shown above the tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileInfo {
    pub competitions: usize,
    pub most_recent: Option<String>,
    pub best_total: String,
    pub best_dots: String,
    pub last_updated: Option<String>,
}

/// Everything the page needs to draw a loaded profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RenderedProfile {
    pub name: Option<String>,
    pub unit: WeightUnit,
    pub personal_bests: Vec<PersonalBestRow>,
    pub competitions: Vec<CompetitionRow>,
    pub info: Option<ProfileInfo>,
}

/// Render a profile. An absent athlete gives an empty profile.
pub fn render(profile: &ProfileData, options: &DisplayOptions) -> RenderedProfile {
    let unit = options.unit;
    let Some(athlete) = profile.athlete.as_ref() else {
        return RenderedProfile {
            name: None,
            unit,
            personal_bests: Vec::new(),
            competitions: Vec::new(),
            info: None,
        };
    };

    let personal_bests = visible_personal_bests(&athlete.personal_best, options.raw_only)
        .into_iter()
        .map(|pb| PersonalBestRow {
            squat: unit.format(pb.squat),
            bench: unit.format(pb.bench),
            deadlift: unit.format(pb.deadlift),
            total: unit.format(pb.total),
            equip: text_or_placeholder(pb.equip.as_deref()),
        })
        .collect();

    let recent = recent_competitions(&athlete.competition_results, options.cutoff_year);
    let competitions = recent
        .iter()
        .map(|c| CompetitionRow {
            competition: text_or_placeholder(c.competition.as_deref()),
            date: text_or_placeholder(c.date.as_deref()),
            location: text_or_placeholder(c.location.as_deref()),
            federation: c.federation.clone(),
            place: c.place.clone(),
            squat: unit.format(c.squat),
            bench: unit.format(c.bench),
            deadlift: unit.format(c.deadlift),
            total: unit.format(competition_total(c)),
            dots: text_or_placeholder(c.dots.as_deref()),
        })
        .collect();

    let info = options.show_info.then(|| ProfileInfo {
        competitions: recent.len(),
        most_recent: recent.first().and_then(|c| c.date.clone()),
        best_total: unit.format(
            recent
                .iter()
                .filter_map(|c| competition_total(c))
                .reduce(f64::max),
        ),
        best_dots: best_dots(&recent),
        last_updated: profile.last_updated.clone(),
    });

    RenderedProfile {
        name: athlete.name.clone(),
        unit,
        personal_bests,
        competitions,
        info,
    }
}

/// Highest numeric DOTS, shown as the provider wrote it.
fn best_dots(results: &[&CompetitionResult]) -> String {
    results
        .iter()
        .filter_map(|c| {
            let raw = c.dots.as_deref()?;
            raw.parse::<f64>().ok().map(|score| (score, raw))
        })
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, raw)| raw.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn text_or_placeholder(text: Option<&str>) -> String {
    text.unwrap_or(PLACEHOLDER).to_string()
}
