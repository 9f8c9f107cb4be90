// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Study session model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A study session hosted at an (optional) spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StudySession {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub subject: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub spot_id: Option<i64>,
    /// Creator
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: i64,
    /// Members in join order, starting with the creator. Repeats are kept.
    #[cfg_attr(feature = "binding-generation", ts(type = "Array<number>"))]
    pub joined_users: Vec<i64>,
    pub created_at: String,
}

/// What a student wants to study, used for session matching.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudyInterest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub difficulty: String,
    /// Preferred time; not used for matching yet.
    #[serde(default)]
    pub time: String,
}

impl StudyInterest {
    /// Text that is embedded for similarity matching.
    pub fn embedding_text(&self) -> String {
        format!("{} {} {}", self.subject, self.topic, self.difficulty)
    }
}
