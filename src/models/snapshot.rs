// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Cached athlete snapshot, the single record shared by the refresh job and
//! the profile view.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record stored at the snapshot key.
///
/// Written wholesale by each successful refresh; nothing from a previous
/// snapshot survives the next write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteSnapshot {
    /// Raw response body from the Close Powerlifting API, stored as-is
    pub data: Value,
    /// When the refresh ran (ISO 8601)
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

impl AthleteSnapshot {
    pub fn new(data: Value, last_updated: String) -> Self {
        Self { data, last_updated }
    }

    /// Convert to the JSON value written to the store.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "data": self.data,
            "lastUpdated": self.last_updated,
        })
    }
}
