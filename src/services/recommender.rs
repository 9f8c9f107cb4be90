// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Spot recommendation from extracted filter criteria.

use serde::Deserialize;
use std::sync::Arc;

use crate::db::{DatabaseError, SpotField, SpotFilter, SqliteDb};
use crate::models::{Spot, SpotCategory};
use crate::services::llm::{parse_json_reply, ChatPrompt, LanguageModel};

/// Filter fields extracted from a user's request.
///
/// Values are kept as raw strings; empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpotCriteria {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub noise_level: Option<String>,
    #[serde(default)]
    pub amenities: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub seating: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl SpotCriteria {
    pub fn kind(&self) -> Option<&str> {
        present(&self.kind)
    }

    pub fn noise_level(&self) -> Option<&str> {
        present(&self.noise_level)
    }

    pub fn amenities(&self) -> Option<&str> {
        present(&self.amenities)
    }

    pub fn activity(&self) -> Option<&str> {
        present(&self.activity)
    }

    pub fn subject(&self) -> Option<&str> {
        present(&self.subject)
    }

    pub fn location(&self) -> Option<&str> {
        present(&self.location)
    }

    pub fn seating(&self) -> Option<&str> {
        present(&self.seating)
    }

    /// Keyword guess used when extraction fails.
    ///
    /// Literal, case-sensitive checks for `quiet` and `coffee`; always a study request.
    pub fn heuristic(query: &str) -> Self {
        Self {
            kind: Some(SpotCategory::Study.as_str().to_string()),
            noise_level: query.contains("quiet").then(|| "quiet".to_string()),
            amenities: query.contains("coffee").then(|| "coffee".to_string()),
            ..Default::default()
        }
    }
}

/// Store filter for a recommendation: category (default `study`), then
/// noise level, amenities substring and activity when present.
pub fn recommendation_filter(criteria: &SpotCriteria) -> SpotFilter {
    SpotFilter::new()
        .eq(
            SpotField::Category,
            criteria.kind().unwrap_or(SpotCategory::Study.as_str()),
        )
        .eq_opt(SpotField::NoiseLevel, criteria.noise_level())
        .contains_opt(SpotField::Amenities, criteria.amenities())
        .eq_opt(SpotField::Activity, criteria.activity())
}

fn parse_prompt(query: &str) -> String {
    format!(
        "Extract the following information from the user's request:
- type: study or recreation
- noise_level (if mentioned)
- amenities (if mentioned)
- activity (if recreation)
- subject (if study)
Return only a JSON object.
User request: {query}"
    )
}

/// Turns requests into spot lists.
#[derive(Clone)]
pub struct SpotRecommender {
    llm: Arc<dyn LanguageModel>,
    db: SqliteDb,
}

impl SpotRecommender {
    pub fn new(llm: Arc<dyn LanguageModel>, db: SqliteDb) -> Self {
        Self { llm, db }
    }

    /// Extract criteria from free text, falling back to [`SpotCriteria::heuristic`].
    pub async fn parse_query(&self, query: &str) -> SpotCriteria {
        let parsed = match self.llm.complete(&ChatPrompt::user(parse_prompt(query))).await {
            Ok(reply) => parse_json_reply(&reply),
            Err(e) => Err(e),
        };

        parsed.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Query parsing failed, using keyword heuristic");
            SpotCriteria::heuristic(query)
        })
    }

    /// Spots matching every present criterion, in store order.
    pub async fn recommend(&self, criteria: &SpotCriteria) -> Result<Vec<Spot>, DatabaseError> {
        let spots = self.db.query_spots(&recommendation_filter(criteria)).await?;
        tracing::debug!(count = spots.len(), "Recommended spots");
        Ok(spots)
    }
}
