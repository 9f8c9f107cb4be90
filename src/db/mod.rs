// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Database layer (libSQL).

pub mod filter;
pub mod sqlite;

pub use filter::{SpotField, SpotFilter};
pub use sqlite::SqliteDb;

/// Table names as constants.
pub mod tables {
    pub const USERS: &str = "users";
    pub const SPOTS: &str = "spots";
    pub const STUDY_SESSIONS: &str = "study_sessions";
    /// Append-only membership log, one row per join
    pub const SESSION_MEMBERS: &str = "session_members";
}

/// Errors from database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Schema setup failed: {0}")]
    Schema(String),

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("No result returned")]
    NoResult,

    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}
