// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Spot listing, lookup, creation and categorization routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::{SpotField, SpotFilter};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{NewSpot, Spot, SpotCategory};
use crate::AppState;
use axum::Extension;

/// Spot routes open to everyone.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/spots/study", get(list_study_spots))
        .route("/api/spots/recreation", get(list_recreation_spots))
        .route("/api/spots/categorize", post(categorize_spot))
        .route("/api/spots/{id}", get(get_spot))
}

/// Spot routes that need a signed-in user.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/spots", post(create_spot))
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct StudySpotsQuery {
    noise_level: Option<String>,
    location: Option<String>,
}

/// Study spots, optionally narrowed by exact noise level and location.
async fn list_study_spots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StudySpotsQuery>,
) -> Result<Json<Vec<Spot>>> {
    let filter = SpotFilter::new()
        .category(SpotCategory::Study)
        .eq_opt(SpotField::NoiseLevel, params.noise_level.as_deref())
        .eq_opt(SpotField::Location, params.location.as_deref());

    Ok(Json(state.db.query_spots(&filter).await?))
}

#[derive(Debug, Deserialize)]
struct RecreationSpotsQuery {
    activity: Option<String>,
}

/// Recreation spots, optionally narrowed by exact activity.
async fn list_recreation_spots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecreationSpotsQuery>,
) -> Result<Json<Vec<Spot>>> {
    let filter = SpotFilter::new()
        .category(SpotCategory::Recreation)
        .eq_opt(SpotField::Activity, params.activity.as_deref());

    Ok(Json(state.db.query_spots(&filter).await?))
}

async fn get_spot(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Result<Json<Spot>> {
    state
        .db
        .get_spot(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Spot {id} not found")))
}

// ─── Creation ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateSpotRequest {
    #[serde(flatten)]
    pub spot: NewSpot,
    /// Free text handed to the categorizer when a recreation spot has no activity.
    #[serde(default)]
    pub description: Option<String>,
}

/// Add a spot. Recreation spots without an activity get one from the categorizer.
async fn create_spot(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateSpotRequest>,
) -> Result<(StatusCode, Json<Spot>)> {
    let mut spot = payload.spot;
    if spot.name.trim().is_empty() || spot.location.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Spot name and location are required".to_string(),
        ));
    }

    let needs_activity = spot.activity.as_deref().map_or(true, str::is_empty);
    if spot.category() == SpotCategory::Recreation && needs_activity {
        let description = payload.description.as_deref().unwrap_or_default();
        spot.activity = Some(state.categorizer.categorize(&spot.name, description).await);
    }

    let stored = state.db.insert_spot(&spot).await?;
    tracing::info!(
        spot_id = stored.id,
        user_id = user.user_id,
        category = %stored.category,
        "Spot created"
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

// ─── Categorization ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CategorizeRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CategorizeResponse {
    pub activity: String,
}

async fn categorize_spot(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CategorizeRequest>,
) -> Json<CategorizeResponse> {
    let activity = state
        .categorizer
        .categorize(&payload.name, &payload.description)
        .await;
    Json(CategorizeResponse { activity })
}
