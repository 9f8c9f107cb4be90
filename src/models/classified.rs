// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Assistant responses produced by query classification.

use crate::models::{Spot, SpotCategory};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One item of an assistant reply, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ClassifiedQuery {
    /// Free-text answer to a study question
    StudyAnswer { answer: String },
    /// A study spot
    Study(SpotMatch),
    /// A recreation spot
    Recreation(SpotMatch),
}

/// Spot fields returned to the assistant client. Unknown fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SpotMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub id: Option<i64>,
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<String>,
}

impl From<Spot> for ClassifiedQuery {
    fn from(spot: Spot) -> Self {
        let category = spot.category;
        let found = SpotMatch {
            id: Some(spot.id),
            name: spot.name,
            location: spot.location,
            activity: spot.activity,
            hours: spot.hours,
            noise_level: spot.noise_level,
            seating: spot.seating,
            amenities: spot.amenities,
        };
        match category {
            SpotCategory::Study => ClassifiedQuery::Study(found),
            SpotCategory::Recreation => ClassifiedQuery::Recreation(found),
        }
    }
}
