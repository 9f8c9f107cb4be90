// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Study session store and matcher tests.

use lumora::models::StudyInterest;
use lumora::services::{DisabledModel, SessionMatcher};
use std::sync::Arc;

mod common;
use common::{create_user, test_db, ScriptedModel};

fn interest(subject: &str, topic: &str, difficulty: &str) -> StudyInterest {
    StudyInterest {
        subject: subject.to_string(),
        topic: topic.to_string(),
        difficulty: difficulty.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_session_starts_with_creator() {
    let db = test_db().await;
    let alice = create_user(&db, "alice").await;

    let session = db.create_session("Calculus", None, alice.id).await.unwrap();

    assert_eq!(session.user_id, alice.id);
    assert_eq!(session.joined_users, vec![alice.id]);
    assert_eq!(db.get_session(session.id).await.unwrap(), Some(session));
}

#[tokio::test]
async fn test_join_missing_session_changes_nothing() {
    let db = test_db().await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    let session = db.create_session("Physics", None, alice.id).await.unwrap();
    let before = db.list_sessions().await.unwrap();

    let joined = db.join_session(session.id + 100, bob.id).await.unwrap();

    assert_eq!(joined, None);
    assert_eq!(db.list_sessions().await.unwrap(), before);
}

#[tokio::test]
async fn test_concurrent_joins_are_all_recorded() {
    let db = test_db().await;
    let host = create_user(&db, "host").await;
    let session = db.create_session("Chemistry", None, host.id).await.unwrap();

    let mut members = Vec::new();
    for i in 0..8 {
        members.push(create_user(&db, &format!("member{i}")).await.id);
    }

    let handles: Vec<_> = members
        .iter()
        .map(|&user_id| {
            let db = db.clone();
            tokio::spawn(async move { db.join_session(session.id, user_id).await })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_some());
    }

    let stored = db.get_session(session.id).await.unwrap().unwrap();
    assert_eq!(stored.joined_users.len(), 1 + members.len());
    assert_eq!(stored.joined_users[0], host.id);
    for id in &members {
        assert!(stored.joined_users.contains(id));
    }
}

#[tokio::test]
async fn test_fallback_matches_subject_substring() {
    let db = test_db().await;
    let alice = create_user(&db, "alice").await;
    let calc = db.create_session("Calculus", None, alice.id).await.unwrap();
    db.create_session("World History", None, alice.id).await.unwrap();
    let review = db
        .create_session("calculus final review", None, alice.id)
        .await
        .unwrap();

    let matcher = SessionMatcher::new(Arc::new(DisabledModel), db);
    let found = matcher
        .match_sessions(&interest("Calculus", "limits", "easy"))
        .await
        .unwrap();

    let ids: Vec<i64> = found.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![calc.id, review.id]);
}

#[tokio::test]
async fn test_embedding_match_ranks_above_threshold() {
    let db = test_db().await;
    let alice = create_user(&db, "alice").await;
    db.create_session("Algebra", None, alice.id).await.unwrap();
    let close = db.create_session("Calculus", None, alice.id).await.unwrap();
    let closest = db.create_session("Calc II", None, alice.id).await.unwrap();
    db.create_session("Poetry", None, alice.id).await.unwrap();

    let model = Arc::new(
        ScriptedModel::new()
            .embedding("Calculus integrals hard", vec![1.0, 0.0])
            .embedding("Algebra", vec![0.7, 0.7])
            .embedding("Calculus", vec![0.9, 0.1])
            .embedding("Calc II", vec![1.0, 0.01])
            .embedding("Poetry", vec![0.0, 1.0]),
    );
    let matcher = SessionMatcher::new(model.clone(), db);

    let found = matcher
        .match_sessions(&interest("Calculus", "integrals", "hard"))
        .await
        .unwrap();

    // Algebra scores about 0.71, below the threshold.
    let ids: Vec<i64> = found.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![closest.id, close.id]);

    // Subjects are embedded once; a second match only embeds the interest.
    let after_first = model.embedded_texts();
    matcher
        .match_sessions(&interest("Calculus", "integrals", "hard"))
        .await
        .unwrap();
    assert_eq!(model.embedded_texts(), after_first + 1);
}

#[tokio::test]
async fn test_partial_embedding_failure_uses_fallback() {
    let db = test_db().await;
    let alice = create_user(&db, "alice").await;
    let physics = db.create_session("Physics", None, alice.id).await.unwrap();
    db.create_session("Biology", None, alice.id).await.unwrap();

    // No embedding for "Biology", so the batch fails.
    let model = Arc::new(
        ScriptedModel::new()
            .embedding("physics  ", vec![1.0, 0.0])
            .embedding("Physics", vec![0.0, 1.0]),
    );
    let matcher = SessionMatcher::new(model, db);

    let found = matcher
        .match_sessions(&interest("physics", "", ""))
        .await
        .unwrap();

    let ids: Vec<i64> = found.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![physics.id]);
}
