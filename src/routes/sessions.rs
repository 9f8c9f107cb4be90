// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Study session routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{StudyInterest, StudySession};
use crate::AppState;

/// Session routes open to everyone.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/match", post(match_sessions))
}

/// Session routes that need a signed-in user.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/join", post(join_session))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[serde(default)]
    pub spot_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct JoinSessionRequest {
    pub session_id: i64,
}

async fn list_sessions(State(state): State<Arc<AppState>>) -> Result<Json<Vec<StudySession>>> {
    Ok(Json(state.db.list_sessions().await?))
}

/// Create a session hosted by the caller, who becomes its first member.
async fn create_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<StudySession>)> {
    payload.validate()?;

    if let Some(spot_id) = payload.spot_id {
        if state.db.get_spot(spot_id).await?.is_none() {
            return Err(AppError::BadRequest(format!("Spot {spot_id} does not exist")));
        }
    }

    let session = state
        .db
        .create_session(&payload.subject, payload.spot_id, user.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Add the caller to a session's member list.
async fn join_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<JoinSessionRequest>,
) -> Result<Json<StudySession>> {
    let session = state
        .db
        .join_session(payload.session_id, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", payload.session_id)))?;

    tracing::info!(
        session_id = session.id,
        user_id = user.user_id,
        members = session.joined_users.len(),
        "User joined session"
    );
    Ok(Json(session))
}

/// Sessions relevant to the posted study interest.
async fn match_sessions(
    State(state): State<Arc<AppState>>,
    Json(interest): Json<StudyInterest>,
) -> Result<Json<Vec<StudySession>>> {
    Ok(Json(state.matcher.match_sessions(&interest).await?))
}
