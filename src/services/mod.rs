// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Services module - assistant and matching logic.

pub mod catalog;
pub mod categorizer;
pub mod classifier;
pub mod llm;
pub mod matcher;
pub mod passwords;
pub mod recommender;

pub use catalog::{CatalogError, SpotCatalog};
pub use categorizer::SpotCategorizer;
pub use classifier::{route_query, QueryClassifier, QueryRoute};
pub use llm::{ChatPrompt, DisabledModel, LanguageModel, LlmError, OpenAiClient};
pub use matcher::{cosine_similarity, SessionMatcher};
pub use recommender::{SpotCriteria, SpotRecommender};
