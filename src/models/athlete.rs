// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Athlete records decoded from the cached Close Powerlifting payload.
//!
//! The payload is never validated before caching, so every field here is
//! read defensively: missing or oddly typed values decode to `None` or an
//! empty list instead of failing.

use serde_json::Value;

/// Athlete extracted from `data.data[0]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Athlete {
    pub name: Option<String>,
    pub personal_best: Vec<PersonalBest>,
    pub competition_results: Vec<CompetitionResult>,
}

/// Best-ever lifts for one equipment category (pounds).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalBest {
    pub squat: Option<f64>,
    pub bench: Option<f64>,
    pub deadlift: Option<f64>,
    pub total: Option<f64>,
    /// Equipment category, e.g. "Raw", "Wraps", "Single-ply"
    pub equip: Option<String>,
}

/// One meet result (pounds).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetitionResult {
    pub competition: Option<String>,
    /// Meet date as sent by the provider (normally `YYYY-MM-DD`)
    pub date: Option<String>,
    pub location: Option<String>,
    pub squat: Option<f64>,
    pub bench: Option<f64>,
    pub deadlift: Option<f64>,
    /// Reported total; `None` when missing, empty or not a number
    pub total: Option<f64>,
    /// Reported total as sent (e.g. `"1179.5"`, `"DQ"`); `None` when missing or blank
    pub reported_total: Option<String>,
    /// DOTS score, passed through untouched
    pub dots: Option<String>,
    pub federation: Option<String>,
    pub division: Option<String>,
    pub weight_class: Option<String>,
    pub bodyweight: Option<f64>,
    pub place: Option<String>,
}

impl Athlete {
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: text_field(value, "name"),
            personal_best: list_field(value, "personal_best", PersonalBest::from_value),
            competition_results: list_field(
                value,
                "competition_results",
                CompetitionResult::from_value,
            ),
        }
    }
}

impl PersonalBest {
    pub fn from_value(value: &Value) -> Self {
        Self {
            squat: number_field(value, "squat"),
            bench: number_field(value, "bench"),
            deadlift: number_field(value, "deadlift"),
            total: number_field(value, "total"),
            equip: text_field(value, "equip"),
        }
    }

    /// Whether the equipment tag contains "raw", ignoring case.
    pub fn is_raw(&self) -> bool {
        self.equip
            .as_deref()
            .is_some_and(|equip| equip.to_lowercase().contains("raw"))
    }
}

impl CompetitionResult {
    pub fn from_value(value: &Value) -> Self {
        Self {
            competition: text_field(value, "competition"),
            date: text_field(value, "date"),
            location: text_field(value, "location"),
            squat: number_field(value, "squat"),
            bench: number_field(value, "bench"),
            deadlift: number_field(value, "deadlift"),
            total: number_field(value, "total"),
            reported_total: text_field(value, "total"),
            dots: text_field(value, "dots"),
            federation: text_field(value, "federation"),
            division: text_field(value, "division"),
            weight_class: text_field(value, "weight_class"),
            bodyweight: number_field(value, "bodyweight"),
            place: text_field(value, "place"),
        }
    }
}

/// Numeric field that may arrive as a JSON number or a numeric string.
fn number_field(value: &Value, key: &str) -> Option<f64> {
    lift_value(value.get(key)?)
}

/// Decode a lift figure. Empty or non-numeric values are `None`.
pub fn lift_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Text field; numbers are stringified, blanks are `None`.
fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn list_field<T>(value: &Value, key: &str, decode: fn(&Value) -> T) -> Vec<T> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|v| v.is_object()).map(decode).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_numbers_and_numeric_strings() {
        let pb = PersonalBest::from_value(&json!({
            "squat": "402.5",
            "bench": 275,
            "deadlift": "",
            "total": null,
            "equip": "Raw"
        }));

        assert_eq!(pb.squat, Some(402.5));
        assert_eq!(pb.bench, Some(275.0));
        assert_eq!(pb.deadlift, None);
        assert_eq!(pb.total, None);
        assert!(pb.is_raw());
    }

    #[test]
    fn test_raw_match_is_case_insensitive_substring() {
        let tagged = |equip: &str| PersonalBest {
            equip: Some(equip.to_string()),
            ..Default::default()
        };

        assert!(tagged("RAW").is_raw());
        assert!(tagged("Raw (wraps)").is_raw());
        assert!(!tagged("Equipped").is_raw());
        assert!(!PersonalBest::default().is_raw());
    }

    #[test]
    fn test_missing_lists_decode_empty() {
        let athlete = Athlete::from_value(&json!({"name": "Lifter", "personal_best": "n/a"}));

        assert_eq!(athlete.name.as_deref(), Some("Lifter"));
        assert!(athlete.personal_best.is_empty());
        assert!(athlete.competition_results.is_empty());
    }

    #[test]
    fn test_dots_passes_through_numbers() {
        let comp = CompetitionResult::from_value(&json!({"dots": 401.22, "place": 1}));

        assert_eq!(comp.dots.as_deref(), Some("401.22"));
        assert_eq!(comp.place.as_deref(), Some("1"));
    }

    #[test]
    fn test_non_numeric_total_is_kept_as_reported() {
        let dq = CompetitionResult::from_value(&json!({"total": "DQ"}));
        assert_eq!(dq.total, None);
        assert_eq!(dq.reported_total.as_deref(), Some("DQ"));

        let blank = CompetitionResult::from_value(&json!({"total": "  "}));
        assert_eq!(blank.reported_total, None);
    }
}
