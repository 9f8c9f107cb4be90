// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

use async_trait::async_trait;
use lumora::config::Config;
use lumora::db::SqliteDb;
use lumora::models::user::Preferences;
use lumora::models::{NewSpot, SpotCategory, User};
use lumora::routes::create_router;
use lumora::services::{ChatPrompt, LanguageModel, LlmError, SpotCatalog};
use lumora::AppState;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Deterministic language model for tests.
///
/// Chat replies are served in order; once they run out every completion
/// fails. Embeddings come from a fixed table and any unknown text fails the
/// whole batch.
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    embeddings: HashMap<String, Vec<f32>>,
    prompts: Mutex<Vec<ChatPrompt>>,
    embedded_texts: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(text.to_string());
        self
    }

    pub fn embedding(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.embeddings.insert(text.to_string(), vector);
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<ChatPrompt> {
        self.prompts.lock().unwrap().clone()
    }

    /// Total number of texts passed to `embed_many`.
    pub fn embedded_texts(&self) -> usize {
        self.embedded_texts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Transport("no scripted reply".to_string()))
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        self.embedded_texts.fetch_add(texts.len(), Ordering::SeqCst);
        texts
            .iter()
            .map(|t| {
                self.embeddings
                    .get(t)
                    .cloned()
                    .ok_or_else(|| LlmError::MalformedResponse(format!("no embedding for {t}")))
            })
            .collect()
    }
}

/// Create a fresh in-memory database.
#[allow(dead_code)]
pub async fn test_db() -> SqliteDb {
    SqliteDb::open_in_memory()
        .await
        .expect("Failed to open in-memory database")
}

/// Create a user directly in the store.
#[allow(dead_code)]
pub async fn create_user(db: &SqliteDb, username: &str) -> User {
    db.create_user(username, "not-a-real-hash", &Preferences::new())
        .await
        .unwrap()
        .expect("username should be free")
}

#[allow(dead_code)]
pub fn spot(
    name: &str,
    category: SpotCategory,
    noise_level: Option<&str>,
    amenities: Option<&str>,
    activity: Option<&str>,
) -> NewSpot {
    NewSpot {
        name: name.to_string(),
        category: Some(category),
        location: "Campus".to_string(),
        noise_level: noise_level.map(String::from),
        amenities: amenities.map(String::from),
        activity: activity.map(String::from),
        ..Default::default()
    }
}

/// Create a test app around the given model and catalog.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app_with(
    llm: Arc<dyn LanguageModel>,
    catalog: SpotCatalog,
) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db().await;
    let state = Arc::new(AppState::new(config, db, catalog, llm));
    (create_router(state.clone()), state)
}

/// Create a test app with no language model and an empty catalog.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(
        Arc::new(lumora::services::DisabledModel),
        SpotCatalog::default(),
    )
    .await
}

/// Decode a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
