// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Study session matching by embedding similarity.
//!
//! The interest text and every session subject are embedded; sessions whose
//! cosine similarity to the interest is strictly above [`SIMILARITY_THRESHOLD`]
//! match, most similar first. If any embedding call fails the matcher falls
//! back to a case-insensitive substring test on the subject.

use dashmap::DashMap;
use std::sync::Arc;

use crate::db::{DatabaseError, SqliteDb};
use crate::models::{StudyInterest, StudySession};
use crate::services::llm::{LanguageModel, LlmError};

/// Minimum similarity (exclusive) for an embedding match.
pub const SIMILARITY_THRESHOLD: f32 = 0.8;

/// Subject text to embedding, shared across requests.
pub type EmbeddingCache = Arc<DashMap<String, Vec<f32>>>;

/// Cosine similarity of two vectors.
///
/// `None` when the lengths differ, either vector is empty, or either has zero
/// magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Finds study sessions relevant to a learner's interest.
#[derive(Clone)]
pub struct SessionMatcher {
    llm: Arc<dyn LanguageModel>,
    db: SqliteDb,
    cache: EmbeddingCache,
}

impl SessionMatcher {
    pub fn new(llm: Arc<dyn LanguageModel>, db: SqliteDb) -> Self {
        Self {
            llm,
            db,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Sessions matching `interest`.
    ///
    /// Only store failures are errors; language-model failures switch to the
    /// substring fallback.
    pub async fn match_sessions(
        &self,
        interest: &StudyInterest,
    ) -> Result<Vec<StudySession>, DatabaseError> {
        let sessions = self.db.list_sessions().await?;

        match self.similarity_scores(interest, &sessions).await {
            Ok(scores) => {
                let mut ranked: Vec<(f32, StudySession)> = scores
                    .into_iter()
                    .zip(sessions)
                    .filter_map(|(score, session)| {
                        score
                            .filter(|s| *s > SIMILARITY_THRESHOLD)
                            .map(|s| (s, session))
                    })
                    .collect();
                ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

                tracing::debug!(matches = ranked.len(), "Embedding match complete");
                Ok(ranked.into_iter().map(|(_, session)| session).collect())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Embedding match failed, using subject substring");
                Ok(substring_matches(&interest.subject, sessions))
            }
        }
    }

    /// Similarity of each session to the interest, in session order.
    async fn similarity_scores(
        &self,
        interest: &StudyInterest,
        sessions: &[StudySession],
    ) -> Result<Vec<Option<f32>>, LlmError> {
        let query = self.llm.embed(&interest.embedding_text()).await?;

        let mut missing: Vec<String> = sessions
            .iter()
            .filter(|s| !self.cache.contains_key(&s.subject))
            .map(|s| s.subject.clone())
            .collect();
        missing.sort();
        missing.dedup();

        if !missing.is_empty() {
            let embeddings = self.llm.embed_many(&missing).await?;
            if embeddings.len() != missing.len() {
                return Err(LlmError::MalformedResponse(format!(
                    "expected {} embeddings, got {}",
                    missing.len(),
                    embeddings.len()
                )));
            }
            for (subject, embedding) in missing.into_iter().zip(embeddings) {
                self.cache.insert(subject, embedding);
            }
        }

        Ok(sessions
            .iter()
            .map(|s| {
                self.cache
                    .get(&s.subject)
                    .and_then(|embedding| cosine_similarity(&query, embedding.value()))
            })
            .collect())
    }
}

fn substring_matches(subject: &str, sessions: Vec<StudySession>) -> Vec<StudySession> {
    let needle = subject.to_lowercase();
    sessions
        .into_iter()
        .filter(|s| s.subject.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: i64, subject: &str) -> StudySession {
        StudySession {
            id,
            subject: subject.to_string(),
            spot_id: None,
            user_id: 1,
            joined_users: vec![1],
            created_at: String::new(),
        }
    }

    #[test]
    fn test_cosine_of_vector_with_itself_is_one() {
        let a = [0.3, -1.2, 4.0, 0.5];
        let sim = cosine_similarity(&a, &a).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let a = [1.0, 2.0, 3.0];
        let b = [-2.0, 0.5, 1.0];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), Some(0.0));
    }

    #[test]
    fn test_cosine_undefined_cases() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), None);
        assert_eq!(cosine_similarity(&[1.0, 1.0], &[1.0]), None);
        assert_eq!(cosine_similarity(&[], &[]), None);
    }

    #[test]
    fn test_substring_matches_ignores_case_and_keeps_order() {
        let sessions = vec![
            session(1, "AP Calculus BC"),
            session(2, "History"),
            session(3, "calculus review"),
        ];
        let found = substring_matches("CALCULUS", sessions);
        let ids: Vec<i64> = found.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_empty_subject_matches_everything() {
        let sessions = vec![session(1, "Physics"), session(2, "Art")];
        assert_eq!(substring_matches("", sessions).len(), 2);
    }
}
