// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development. The language-model API
//! key is optional: without it the server runs with every AI feature on its
//! documented fallback path.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Server ---
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,

    // --- Storage ---
    /// libSQL database file (`:memory:` for an ephemeral store)
    pub database_path: String,
    /// Static spot catalog (JSON)
    pub spot_catalog_path: String,
    /// Seed an empty spot table from the catalog at startup
    pub seed_spots: bool,

    // --- Auth ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// PBKDF2 rounds used for new password hashes
    pub password_hash_iterations: u32,

    // --- Language model ---
    /// API key; `None` disables the external service
    pub llm_api_key: Option<String>,
    /// OpenAI-compatible API base URL
    pub llm_base_url: String,
    pub llm_chat_model: String,
    pub llm_embedding_model: String,
    /// Per-request timeout for language-model calls
    pub llm_timeout_secs: u64,
}

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_PASSWORD_HASH_ITERATIONS: u32 = 100_000;

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "lumora.db".to_string()),
            spot_catalog_path: env::var("SPOT_CATALOG_PATH")
                .unwrap_or_else(|_| "data/spots.json".to_string()),
            seed_spots: parse_var("SEED_SPOTS", true)?,

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            password_hash_iterations: parse_var(
                "PASSWORD_HASH_ITERATIONS",
                DEFAULT_PASSWORD_HASH_ITERATIONS,
            )?,

            llm_api_key: env::var("LLM_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            llm_chat_model: env::var("LLM_CHAT_MODEL")
                .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
            llm_embedding_model: env::var("LLM_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            llm_timeout_secs: parse_var("LLM_TIMEOUT_SECS", 30)?,
        })
    }

    /// Offline configuration for tests: in-memory store, no API key, cheap hashing.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            database_path: ":memory:".to_string(),
            spot_catalog_path: "data/spots.json".to_string(),
            seed_spots: false,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            password_hash_iterations: 1_000,
            llm_api_key: None,
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_chat_model: DEFAULT_CHAT_MODEL.to_string(),
            llm_embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            llm_timeout_secs: 5,
        }
    }
}

/// Parse an optional environment variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
