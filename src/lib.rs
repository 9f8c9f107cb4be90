// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Lumora: campus study and recreation assistant.
//!
//! This crate provides the backend API for finding study and recreation
//! spots, answering study questions and organizing study sessions.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::SqliteDb;
use services::{
    LanguageModel, QueryClassifier, SessionMatcher, SpotCatalog, SpotCategorizer, SpotRecommender,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: SqliteDb,
    pub catalog: Arc<SpotCatalog>,
    pub classifier: QueryClassifier,
    pub recommender: SpotRecommender,
    pub matcher: SessionMatcher,
    pub categorizer: SpotCategorizer,
}

impl AppState {
    /// Wire every component to the same store, catalog and language model.
    pub fn new(
        config: Config,
        db: SqliteDb,
        catalog: SpotCatalog,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            classifier: QueryClassifier::new(llm.clone(), catalog.clone(), db.clone()),
            recommender: SpotRecommender::new(llm.clone(), db.clone()),
            matcher: SessionMatcher::new(llm.clone(), db.clone()),
            categorizer: SpotCategorizer::new(llm),
            config,
            db,
            catalog,
        }
    }
}
