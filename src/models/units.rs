// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Weight units and display formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kilograms per pound.
pub const LBS_TO_KG: f64 = 0.453592;

/// Rendered in place of a missing or unusable figure.
pub const PLACEHOLDER: &str = "—";

/// Unit used for every displayed weight. Provider values are pounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    pub fn label(self) -> &'static str {
        match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        }
    }

    /// Convert a value in pounds to this unit.
    pub fn from_lbs(self, lbs: f64) -> f64 {
        match self {
            WeightUnit::Lbs => lbs,
            WeightUnit::Kg => lbs * LBS_TO_KG,
        }
    }

    /// Format a pound value with one decimal, or the placeholder when the
    /// value is missing, zero or not finite.
    pub fn format(self, lbs: Option<f64>) -> String {
        match lbs {
            Some(v) if v.is_finite() && v != 0.0 => {
                format!("{:.1} {}", self.from_lbs(v), self.label())
            }
            _ => PLACEHOLDER.to_string(),
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lbs" | "lb" => Ok(WeightUnit::Lbs),
            "kg" | "kgs" => Ok(WeightUnit::Kg),
            other => Err(format!("unknown weight unit '{}'", other)),
        }
    }
}
