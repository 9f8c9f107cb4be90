// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Study and recreation spot model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of spot. Stored as the lower-case name in the `category` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SpotCategory {
    Study,
    Recreation,
}

impl SpotCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotCategory::Study => "study",
            SpotCategory::Recreation => "recreation",
        }
    }
}

impl std::fmt::Display for SpotCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpotCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "study" => Ok(SpotCategory::Study),
            "recreation" => Ok(SpotCategory::Recreation),
            other => Err(format!("unknown spot category: {other}")),
        }
    }
}

/// Stored spot record.
///
/// Category-specific fields (`noise_level` for study spots, `activity` for
/// recreation spots) may be present on either kind; nothing cross-checks them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Spot {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub category: SpotCategory,
    pub location: String,
    /// Activity label (recreation spots)
    pub activity: Option<String>,
    /// Opening hours, free text
    pub hours: Option<String>,
    /// Noise level (study spots)
    pub noise_level: Option<String>,
    /// Seating description
    pub seating: Option<String>,
    /// Comma-separated amenities, matched by substring
    pub amenities: Option<String>,
}

/// Spot fields supplied on insert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSpot {
    pub name: String,
    #[serde(rename = "type", default)]
    pub category: Option<SpotCategory>,
    pub location: String,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub noise_level: Option<String>,
    #[serde(default)]
    pub seating: Option<String>,
    #[serde(default)]
    pub amenities: Option<String>,
}

impl NewSpot {
    /// Category used for storage; unspecified spots are study spots.
    pub fn category(&self) -> SpotCategory {
        self.category.unwrap_or(SpotCategory::Study)
    }
}
