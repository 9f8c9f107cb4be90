// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Assistant and recommendation routes.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{ClassifiedQuery, Spot};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/assistant", post(assistant))
        .route("/api/recommend", post(recommend))
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Upper bound on query length accepted by the assistant endpoints.
const MAX_QUERY_LEN: usize = 2000;

fn check_query(query: &str) -> Result<()> {
    if query.len() > MAX_QUERY_LEN {
        return Err(AppError::BadRequest(format!(
            "Query exceeds {MAX_QUERY_LEN} bytes"
        )));
    }
    Ok(())
}

/// Classify a free-text query and answer it.
async fn assistant(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<Vec<ClassifiedQuery>>> {
    check_query(&payload.query)?;
    Ok(Json(state.classifier.classify(&payload.query).await))
}

/// Extract criteria from a free-text request and list matching spots.
async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<Vec<Spot>>> {
    check_query(&payload.query)?;
    let criteria = state.recommender.parse_query(&payload.query).await;
    tracing::debug!(?criteria, "Parsed recommendation request");
    Ok(Json(state.recommender.recommend(&criteria).await?))
}
