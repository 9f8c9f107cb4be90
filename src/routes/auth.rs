// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Username/password authentication routes.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AUTH_COOKIE, SESSION_TTL_SECS};
use crate::models::user::Preferences;
use crate::models::User;
use crate::services::passwords::{hash_password, verify_password};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 80))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub token: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub user: User,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create an account. The password is stored as a salted hash.
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>)> {
    payload.validate()?;

    let iterations = state.config.password_hash_iterations;
    let password = payload.password;
    let password_hash =
        tokio::task::spawn_blocking(move || hash_password(&password, iterations))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {e}")))?
            .map_err(|e| AppError::Internal(e.into()))?;

    let user = state
        .db
        .create_user(&payload.username, &password_hash, &payload.preferences)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(format!("Username {} is already taken", payload.username))
        })?;

    tracing::info!(user_id = user.id, "User signed up");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Verify credentials and start a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let user = state
        .db
        .get_user_by_username(&payload.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let stored = user.password_hash.clone();
    let password = payload.password;
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {e}")))?;

    if !valid {
        tracing::debug!(user_id = user.id, "Login rejected");
        return Err(AppError::Unauthorized);
    }

    let token = create_jwt(user.id, &state.config.jwt_signing_key)?;

    let cookie = Cookie::build((AUTH_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64));

    tracing::info!(user_id = user.id, "User logged in");
    Ok((jar.add(cookie), Json(LoginResponse { token, user })))
}

/// Clear the session cookie.
///
/// An expired cookie is always sent, whether or not the request carried one.
async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let expired = Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO);
    let jar = jar.add(expired);
    (
        jar,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}
