// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Spot, session and assistant route tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use lumora::middleware::auth::create_jwt;
use lumora::models::SpotCategory;
use lumora::services::SpotCatalog;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, create_test_app_with, create_user, spot, ScriptedModel};

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_study_spot_listing_filters() {
    let (app, state) = create_test_app().await;
    let spots = [
        spot("Stacks", SpotCategory::Study, Some("quiet"), None, None),
        spot("Union Hall", SpotCategory::Study, Some("loud"), None, None),
        spot("Court C", SpotCategory::Recreation, None, None, Some("basketball")),
    ];
    state.db.seed_spots(&spots).await.unwrap();

    let response = app
        .clone()
        .oneshot(request("GET", "/api/spots/study?noise_level=quiet", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Stacks");
    assert_eq!(body[0]["type"], "study");

    let response = app
        .oneshot(request("GET", "/api/spots/recreation?activity=basketball", None, None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Court C");
}

#[tokio::test]
async fn test_get_spot_by_id() {
    let (app, state) = create_test_app().await;
    let stored = state
        .db
        .insert_spot(&spot("Stacks", SpotCategory::Study, Some("quiet"), None, None))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request("GET", &format!("/api/spots/{}", stored.id), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Stacks");

    let missing = app
        .oneshot(request("GET", "/api/spots/4242", None, None))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(missing).await["error"], "not_found");
}

#[tokio::test]
async fn test_create_recreation_spot_is_categorized() {
    let model = Arc::new(ScriptedModel::new().reply("  Tennis\n"));
    let (app, state) = create_test_app_with(model, SpotCatalog::default()).await;
    let user = create_user(&state.db, "coach").await;
    let token = create_jwt(user.id, &state.config.jwt_signing_key).unwrap();

    let body = json!({
        "name": "Mitchell Park Courts",
        "type": "recreation",
        "location": "Palo Alto",
        "description": "Six lighted hard courts"
    });

    let unauthenticated = app
        .clone()
        .oneshot(request("POST", "/api/spots", None, Some(body.clone())))
        .await
        .unwrap();
    assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(request("POST", "/api/spots", Some(&token), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["activity"], "tennis");
    assert_eq!(created["type"], "recreation");

    let id = created["id"].as_i64().unwrap();
    let stored = state.db.get_spot(id).await.unwrap().unwrap();
    assert_eq!(stored.activity.as_deref(), Some("tennis"));
}

#[tokio::test]
async fn test_categorize_endpoint_falls_back_to_other() {
    let (app, _) = create_test_app().await;

    let response = app
        .oneshot(request(
            "POST",
            "/api/spots/categorize",
            None,
            Some(json!({"name": "Rinconada Pool", "description": "Outdoor lap pool"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"activity": "other"}));
}

#[tokio::test]
async fn test_session_create_join_and_list() {
    let (app, state) = create_test_app().await;
    let host = create_user(&state.db, "host").await;
    let guest = create_user(&state.db, "guest").await;
    let host_token = create_jwt(host.id, &state.config.jwt_signing_key).unwrap();
    let guest_token = create_jwt(guest.id, &state.config.jwt_signing_key).unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/sessions",
            Some(&host_token),
            Some(json!({"subject": "Linear Algebra"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["user_id"], host.id);
    assert_eq!(created["joined_users"], json!([host.id]));
    let session_id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/sessions/join",
            Some(&guest_token),
            Some(json!({"session_id": session_id})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["joined_users"], json!([host.id, guest.id]));

    let response = app
        .oneshot(request("GET", "/api/sessions", None, None))
        .await
        .unwrap();
    let sessions = body_json(response).await;
    assert_eq!(sessions.as_array().unwrap().len(), 1);
    assert_eq!(sessions[0]["subject"], "Linear Algebra");
}

#[tokio::test]
async fn test_join_missing_session_is_not_found() {
    let (app, state) = create_test_app().await;
    let user = create_user(&state.db, "lonely").await;
    let token = create_jwt(user.id, &state.config.jwt_signing_key).unwrap();

    let response = app
        .oneshot(request(
            "POST",
            "/api/sessions/join",
            Some(&token),
            Some(json!({"session_id": 77})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "not_found");
    assert!(state.db.list_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_session_with_unknown_spot_is_rejected() {
    let (app, state) = create_test_app().await;
    let user = create_user(&state.db, "host").await;
    let token = create_jwt(user.id, &state.config.jwt_signing_key).unwrap();

    let response = app
        .oneshot(request(
            "POST",
            "/api/sessions",
            Some(&token),
            Some(json!({"subject": "Chemistry", "spot_id": 404})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_match_endpoint_uses_fallback_offline() {
    let (app, state) = create_test_app().await;
    let host = create_user(&state.db, "host").await;
    state
        .db
        .create_session("Organic Chemistry", None, host.id)
        .await
        .unwrap();
    state.db.create_session("Art History", None, host.id).await.unwrap();

    let response = app
        .oneshot(request(
            "POST",
            "/api/sessions/match",
            None,
            Some(json!({"subject": "chemistry", "topic": "alkenes", "difficulty": "hard", "time": "evening"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let matches = body_json(response).await;
    assert_eq!(matches.as_array().unwrap().len(), 1);
    assert_eq!(matches[0]["subject"], "Organic Chemistry");
}

#[tokio::test]
async fn test_assistant_endpoint_returns_catalog_spots() {
    let catalog = SpotCatalog::load_from_json(
        r#"{"study_spots": [{"name": "Lib A", "location": "Campus", "noise_level": "quiet"}]}"#,
    )
    .unwrap();
    let (app, _) = create_test_app_with(Arc::new(lumora::services::DisabledModel), catalog).await;

    let response = app
        .oneshot(request(
            "POST",
            "/api/assistant",
            None,
            Some(json!({"query": "Where can I find a quiet place to study?"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
    assert_eq!(
        body_json(response).await,
        json!([{"type": "study", "name": "Lib A", "location": "Campus", "noise_level": "quiet"}])
    );
}

#[tokio::test]
async fn test_recommend_endpoint_with_heuristic() {
    let (app, state) = create_test_app().await;
    let spots = [
        spot("Stacks", SpotCategory::Study, Some("quiet"), Some("wifi"), None),
        spot("Reading Room", SpotCategory::Study, Some("quiet"), Some("coffee"), None),
        spot("Bean There", SpotCategory::Study, Some("moderate"), Some("coffee"), None),
    ];
    state.db.seed_spots(&spots).await.unwrap();

    let response = app
        .oneshot(request(
            "POST",
            "/api/recommend",
            None,
            Some(json!({"query": "somewhere quiet with coffee"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let found = body_json(response).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["name"], "Reading Room");
}
