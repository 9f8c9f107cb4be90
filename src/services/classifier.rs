// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Assistant query classification.
//!
//! A free-text query is routed, first match wins:
//! 1. study question (and no location cue): answered by the language model
//! 2. location cue: every catalog study spot
//! 3. recreation cue: every catalog recreation spot
//! 4. anything else: filters extracted by the language model, applied to the store
//!
//! Keyword tests are lower-cased substring checks, so "how" also fires on
//! "show". Question phrasing wins over location phrasing unless a location
//! cue is present.

use std::sync::Arc;

use crate::db::{SpotField, SpotFilter, SqliteDb};
use crate::models::{ClassifiedQuery, SpotMatch};
use crate::services::catalog::{or_unknown, SpotCatalog};
use crate::services::llm::{parse_json_reply, ChatPrompt, LanguageModel};
use crate::services::recommender::SpotCriteria;

pub const STUDY_KEYWORDS: &[&str] = &[
    "solve",
    "explain",
    "help",
    "question",
    "math",
    "science",
    "history",
    "english",
    "biology",
    "physics",
    "chemistry",
    "calculate",
    "who",
    "what",
    "when",
    "where",
    "why",
    "how",
];

pub const LOCATION_KEYWORDS: &[&str] = &[
    "location",
    "where",
    "place",
    "spot",
    "specific",
    "library",
    "milpitas",
    "san jose",
    "online",
];

pub const RECREATION_KEYWORDS: &[&str] = &[
    "recreation",
    "play",
    "park",
    "basketball",
    "pickleball",
    "tennis",
    "hiking",
    "hang-gliding",
    "dog park",
];

/// System persona for study answers.
pub const STUDY_PERSONA: &str =
    "You are Lumora, a helpful assistant for kids. Answer study questions clearly and simply.";

/// Answer returned when the language model cannot be reached for a study question.
pub const STUDY_ANSWER_UNAVAILABLE: &str =
    "Sorry, I can't answer study questions right now. Please try again in a little while.";

/// Branch a query takes through the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRoute {
    StudyQuestion,
    StudySpots,
    RecreationSpots,
    Structured,
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Decide which branch handles `query`. Pure; no I/O.
pub fn route_query(query: &str) -> QueryRoute {
    let lowered = query.to_lowercase();
    let location = contains_any(&lowered, LOCATION_KEYWORDS);

    if !location && contains_any(&lowered, STUDY_KEYWORDS) {
        QueryRoute::StudyQuestion
    } else if location {
        QueryRoute::StudySpots
    } else if contains_any(&lowered, RECREATION_KEYWORDS) {
        QueryRoute::RecreationSpots
    } else {
        QueryRoute::Structured
    }
}

/// Build the few-shot extraction prompt for structured lookups.
pub fn extraction_prompt(query: &str) -> String {
    format!(
        r#"You are an assistant for a campus app. Given a user's question, extract:
- type: study or recreation
- activity (if recreation)
- subject (if study)
- location (if mentioned)
- any other relevant filters (noise_level, amenities, seating)
Return only a JSON object.

Examples:
Q: What are good spots for studying calculus?
A: {{"type": "study", "subject": "calculus"}}
Q: Where can I play basketball near campus?
A: {{"type": "recreation", "activity": "basketball", "location": "campus"}}
Q: I want a quiet place to study with Wi-Fi.
A: {{"type": "study", "noise_level": "quiet", "amenities": "wifi"}}
Q: Where can I swim in Milpitas?
A: {{"type": "recreation", "activity": "swimming", "location": "Milpitas"}}
Q: Find a coffee shop for group study.
A: {{"type": "study", "amenities": "coffee", "seating": "group"}}

User question: {query}"#
    )
}

/// Routes assistant queries to an answer, a catalog listing, or a store lookup.
#[derive(Clone)]
pub struct QueryClassifier {
    llm: Arc<dyn LanguageModel>,
    catalog: Arc<SpotCatalog>,
    db: SqliteDb,
}

impl QueryClassifier {
    pub fn new(llm: Arc<dyn LanguageModel>, catalog: Arc<SpotCatalog>, db: SqliteDb) -> Self {
        Self { llm, catalog, db }
    }

    /// Classify and answer a free-text query.
    ///
    /// Never fails: service and store problems degrade to a fixed answer
    /// (study questions) or an empty list (structured lookups).
    pub async fn classify(&self, query: &str) -> Vec<ClassifiedQuery> {
        let route = route_query(query);
        tracing::debug!(?route, "Classified assistant query");

        match route {
            QueryRoute::StudyQuestion => vec![self.answer_study_question(query).await],
            QueryRoute::StudySpots => self.catalog_study_spots(),
            QueryRoute::RecreationSpots => self.catalog_recreation_spots(),
            QueryRoute::Structured => self.structured_lookup(query).await,
        }
    }

    async fn answer_study_question(&self, query: &str) -> ClassifiedQuery {
        let prompt = ChatPrompt::user(query).with_system(STUDY_PERSONA);
        let answer = match self.llm.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Study answer unavailable, using fallback text");
                STUDY_ANSWER_UNAVAILABLE.to_string()
            }
        };
        ClassifiedQuery::StudyAnswer { answer }
    }

    fn catalog_study_spots(&self) -> Vec<ClassifiedQuery> {
        self.catalog
            .study_spots()
            .iter()
            .map(|spot| {
                ClassifiedQuery::Study(SpotMatch {
                    name: spot.name.clone(),
                    location: spot.location.clone(),
                    noise_level: Some(or_unknown(&spot.noise_level)),
                    ..Default::default()
                })
            })
            .collect()
    }

    fn catalog_recreation_spots(&self) -> Vec<ClassifiedQuery> {
        self.catalog
            .recreation_spots()
            .iter()
            .map(|spot| {
                ClassifiedQuery::Recreation(SpotMatch {
                    name: spot.name.clone(),
                    location: spot.location.clone(),
                    activity: Some(or_unknown(&spot.activity)),
                    amenities: Some(or_unknown(&spot.amenities)),
                    ..Default::default()
                })
            })
            .collect()
    }

    async fn structured_lookup(&self, query: &str) -> Vec<ClassifiedQuery> {
        let reply = match self.llm.complete(&ChatPrompt::user(extraction_prompt(query))).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "Filter extraction failed");
                return Vec::new();
            }
        };

        let criteria: SpotCriteria = match parse_json_reply(&reply) {
            Ok(criteria) => criteria,
            Err(e) => {
                tracing::warn!(error = %e, "Filter extraction returned malformed JSON");
                return Vec::new();
            }
        };

        match self.db.query_spots(&lookup_filter(&criteria)).await {
            Ok(spots) => spots.into_iter().map(ClassifiedQuery::from).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Spot lookup failed");
                Vec::new()
            }
        }
    }
}

/// Store filter for an extracted structured lookup.
///
/// `subject` and `amenities` match as substrings of the amenities column;
/// every other field is an exact match. Nothing is defaulted.
pub fn lookup_filter(criteria: &SpotCriteria) -> SpotFilter {
    SpotFilter::new()
        .eq_opt(SpotField::Category, criteria.kind())
        .eq_opt(SpotField::Activity, criteria.activity())
        .contains_opt(SpotField::Amenities, criteria.subject())
        .eq_opt(SpotField::Location, criteria.location())
        .eq_opt(SpotField::NoiseLevel, criteria.noise_level())
        .contains_opt(SpotField::Amenities, criteria.amenities())
        .eq_opt(SpotField::Seating, criteria.seating())
}
