// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Language-model capability and its OpenAI-compatible HTTP client.
//!
//! Components depend on the [`LanguageModel`] trait only, so the process entry
//! point decides which implementation runs and tests inject a scripted one.
//! Every call is fallible; callers own the fallback.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;

/// A single chat completion request: optional system persona plus one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: Option<String>,
    pub user: String,
}

impl ChatPrompt {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            system: None,
            user: text.into(),
        }
    }

    pub fn with_system(mut self, persona: impl Into<String>) -> Self {
        self.system = Some(persona.into());
        self
    }
}

/// Text completion and embedding capability.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a chat prompt, returning the assistant text.
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, LlmError>;

    /// Embed several texts in one request. Output order matches input order.
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError>;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        self.embed_many(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| LlmError::MalformedResponse("empty embedding batch".to_string()))
    }
}

/// Errors from language-model calls.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Language model request failed: {0}")]
    Transport(String),

    #[error("Language model rate limit exceeded")]
    RateLimited,

    #[error("Language model rejected credentials")]
    Unauthorized,

    #[error("Language model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed language model response: {0}")]
    MalformedResponse(String),

    #[error("Language model is not configured")]
    Disabled,
}

// ─────────────────────────────────────────────────────────────────────────────
// OpenAI-compatible client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for `/chat/completions` and `/embeddings` on an OpenAI-compatible API.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        chat_model: &str,
        embedding_model: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            chat_model: chat_model.to_string(),
            embedding_model: embedding_model.to_string(),
        })
    }

    /// Build from configuration. Returns `None` when no API key is set.
    pub fn from_config(config: &Config) -> Result<Option<Self>, LlmError> {
        let Some(api_key) = config.llm_api_key.as_deref() else {
            return Ok(None);
        };
        Self::new(
            &config.llm_base_url,
            api_key,
            &config.llm_chat_model,
            &config.llm_embedding_model,
            Duration::from_secs(config.llm_timeout_secs),
        )
        .map(Some)
    }

    /// POST a JSON body and decode the JSON response.
    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, LlmError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                429 => {
                    tracing::warn!("Language model rate limit hit (429)");
                    LlmError::RateLimited
                }
                401 | 403 => LlmError::Unauthorized,
                code => LlmError::Status { status: code, body },
            });
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(format!("JSON parse error: {e}")))
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = prompt.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });

        let request = ChatRequest {
            model: &self.chat_model,
            messages,
        };
        let response: ChatResponse = self.post_json("chat/completions", &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("no completion choices".to_string()))
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: texts,
        };
        let response: EmbeddingResponse = self.post_json("embeddings", &request).await?;

        order_embeddings(response.data, texts.len())
    }
}

/// Put embeddings back in request order and check the batch is complete.
fn order_embeddings(data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Vec<f32>>, LlmError> {
    if data.len() != expected {
        return Err(LlmError::MalformedResponse(format!(
            "expected {expected} embeddings, got {}",
            data.len()
        )));
    }

    let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected];
    for item in data {
        let slot = slots.get_mut(item.index).ok_or_else(|| {
            LlmError::MalformedResponse(format!("embedding index {} out of range", item.index))
        })?;
        *slot = Some(item.embedding);
    }

    slots
        .into_iter()
        .map(|s| s.ok_or_else(|| LlmError::MalformedResponse("duplicate embedding index".into())))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Disabled stand-in
// ─────────────────────────────────────────────────────────────────────────────

/// Used when no API key is configured: every call fails with [`LlmError::Disabled`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledModel;

#[async_trait]
impl LanguageModel for DisabledModel {
    async fn complete(&self, _prompt: &ChatPrompt) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }

    async fn embed_many(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        Err(LlmError::Disabled)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Decode a JSON object from model output, tolerating a Markdown code fence.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim())
        .map_err(|e| LlmError::MalformedResponse(format!("expected JSON object: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_json_reply_plain_and_fenced() {
        let plain: HashMap<String, String> = parse_json_reply(r#"{"type": "study"}"#).unwrap();
        assert_eq!(plain["type"], "study");

        let fenced: HashMap<String, String> =
            parse_json_reply("```json\n{\"type\": \"recreation\"}\n```").unwrap();
        assert_eq!(fenced["type"], "recreation");
    }

    #[test]
    fn test_parse_json_reply_rejects_prose() {
        let result: Result<HashMap<String, String>, _> =
            parse_json_reply("Sure! The type is study.");
        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }

    #[test]
    fn test_order_embeddings_restores_request_order() {
        let data = vec![
            EmbeddingData {
                embedding: vec![2.0],
                index: 1,
            },
            EmbeddingData {
                embedding: vec![1.0],
                index: 0,
            },
        ];
        assert_eq!(order_embeddings(data, 2).unwrap(), vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn test_order_embeddings_rejects_short_batch() {
        let data = vec![EmbeddingData {
            embedding: vec![1.0],
            index: 0,
        }];
        assert!(order_embeddings(data, 2).is_err());
    }

    #[tokio::test]
    async fn test_disabled_model_always_fails() {
        let model = DisabledModel;
        assert!(matches!(
            model.complete(&ChatPrompt::user("hi")).await,
            Err(LlmError::Disabled)
        ));
        assert!(matches!(model.embed("hi").await, Err(LlmError::Disabled)));
    }

    #[test]
    fn test_from_config_without_key_is_none() {
        let config = Config::test_default();
        assert!(OpenAiClient::from_config(&config).unwrap().is_none());
    }
}
