// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! libSQL client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Spots (seeded catalog plus user-created spots)
//! - Study sessions and their append-only member lists
//! - Users (credentials and preferences)
//!
//! Every write is a single auto-committed statement, so the one shared
//! connection never holds an open transaction between requests.

use crate::db::{tables, DatabaseError, SpotFilter};
use crate::models::user::Preferences;
use crate::models::{NewSpot, Spot, StudySession, User};
use libsql::Builder;
use std::collections::HashMap;
use std::sync::Arc;

const SCHEMA: &str = include_str!("schema.sql");

const SPOT_COLUMNS: &str =
    "id, name, category, location, activity, hours, noise_level, seating, amenities";
const USER_COLUMNS: &str = "id, username, password_hash, preferences, created_at";
const SESSION_COLUMNS: &str = "id, subject, spot_id, creator_id, created_at";

/// libSQL database client.
#[derive(Clone)]
pub struct SqliteDb {
    _db: Arc<libsql::Database>,
    conn: libsql::Connection,
}

impl SqliteDb {
    /// Open (or create) a local database file and apply the schema.
    ///
    /// `":memory:"` gives a private in-memory store, used by tests.
    pub async fn open(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Schema(format!("PRAGMA foreign_keys: {e}")))?;

        conn.execute_batch(SCHEMA)
            .await
            .map_err(|e| DatabaseError::Schema(e.to_string()))?;

        tracing::info!(path, "Opened database");

        Ok(Self {
            _db: Arc::new(db),
            conn,
        })
    }

    /// Open a fresh in-memory database.
    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::open(":memory:").await
    }

    // ─── Spot Operations ─────────────────────────────────────────

    /// Insert a spot and return the stored record.
    pub async fn insert_spot(&self, spot: &NewSpot) -> Result<Spot, DatabaseError> {
        let category = spot.category();
        let sql = format!(
            "INSERT INTO {} (name, category, location, activity, hours, noise_level, seating, amenities)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING id",
            tables::SPOTS
        );
        let mut rows = self
            .conn
            .query(
                &sql,
                libsql::params![
                    spot.name.as_str(),
                    category.as_str(),
                    spot.location.as_str(),
                    spot.activity.as_deref(),
                    spot.hours.as_deref(),
                    spot.noise_level.as_deref(),
                    spot.seating.as_deref(),
                    spot.amenities.as_deref()
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let id = row.get::<i64>(0)?;

        Ok(Spot {
            id,
            name: spot.name.clone(),
            category,
            location: spot.location.clone(),
            activity: spot.activity.clone(),
            hours: spot.hours.clone(),
            noise_level: spot.noise_level.clone(),
            seating: spot.seating.clone(),
            amenities: spot.amenities.clone(),
        })
    }

    /// Insert many spots. Returns how many were stored.
    pub async fn seed_spots(&self, spots: &[NewSpot]) -> Result<usize, DatabaseError> {
        for spot in spots {
            self.insert_spot(spot).await?;
        }
        Ok(spots.len())
    }

    /// Get a spot by ID.
    pub async fn get_spot(&self, id: i64) -> Result<Option<Spot>, DatabaseError> {
        let sql = format!("SELECT {SPOT_COLUMNS} FROM {} WHERE id = ?1", tables::SPOTS);
        let mut rows = self.conn.query(&sql, [id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_spot(&row)?)),
            None => Ok(None),
        }
    }

    /// All spots matching every predicate of `filter`, in insertion order.
    pub async fn query_spots(&self, filter: &SpotFilter) -> Result<Vec<Spot>, DatabaseError> {
        let (where_clause, params) = filter.to_sql();
        let sql = format!(
            "SELECT {SPOT_COLUMNS} FROM {}{where_clause} ORDER BY id",
            tables::SPOTS
        );

        tracing::debug!(sql = %sql, params = ?params, "Querying spots");

        let values: Vec<libsql::Value> = params.into_iter().map(libsql::Value::from).collect();
        let mut rows = self
            .conn
            .query(&sql, libsql::params_from_iter(values))
            .await?;

        let mut spots = Vec::new();
        while let Some(row) = rows.next().await? {
            spots.push(row_to_spot(&row)?);
        }
        Ok(spots)
    }

    /// Number of stored spots.
    pub async fn count_spots(&self) -> Result<u64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM {}", tables::SPOTS);
        let mut rows = self.conn.query(&sql, ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?.max(0) as u64)
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Create a user. Returns `None` if the username is already taken.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        preferences: &Preferences,
    ) -> Result<Option<User>, DatabaseError> {
        let prefs_json = serde_json::to_string(preferences)
            .map_err(|e| DatabaseError::InvalidRow(format!("preferences: {e}")))?;
        let now = chrono::Utc::now().to_rfc3339();
        let sql = format!(
            "INSERT INTO {} (username, password_hash, preferences, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (username) DO NOTHING
             RETURNING id",
            tables::USERS
        );

        let mut rows = self
            .conn
            .query(
                &sql,
                libsql::params![username, password_hash, prefs_json, now.as_str()],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        Ok(Some(User {
            id: row.get::<i64>(0)?,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            preferences: preferences.clone(),
            created_at: now,
        }))
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM {} WHERE id = ?1", tables::USERS);
        let mut rows = self.conn.query(&sql, [id]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Get a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM {} WHERE username = ?1",
            tables::USERS
        );
        let mut rows = self.conn.query(&sql, [username]).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    // ─── Study Session Operations ────────────────────────────────

    /// Create a session. The creator becomes the first member.
    pub async fn create_session(
        &self,
        subject: &str,
        spot_id: Option<i64>,
        creator_id: i64,
    ) -> Result<StudySession, DatabaseError> {
        let now = chrono::Utc::now().to_rfc3339();
        let sql = format!(
            "INSERT INTO {} (subject, spot_id, creator_id, created_at)
             VALUES (?1, ?2, ?3, ?4) RETURNING id",
            tables::STUDY_SESSIONS
        );
        let mut rows = self
            .conn
            .query(
                &sql,
                libsql::params![subject, spot_id, creator_id, now.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let id = row.get::<i64>(0)?;

        tracing::info!(session_id = id, creator_id, subject, "Study session created");

        Ok(StudySession {
            id,
            subject: subject.to_string(),
            spot_id,
            user_id: creator_id,
            joined_users: vec![creator_id],
            created_at: now,
        })
    }

    /// Get a session with its member list.
    pub async fn get_session(&self, id: i64) -> Result<Option<StudySession>, DatabaseError> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM {} WHERE id = ?1",
            tables::STUDY_SESSIONS
        );
        let mut rows = self.conn.query(&sql, [id]).await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let mut session = row_to_session(&row)?;

        let sql = format!(
            "SELECT user_id FROM {} WHERE session_id = ?1 ORDER BY position",
            tables::SESSION_MEMBERS
        );
        let mut members = self.conn.query(&sql, [id]).await?;
        while let Some(row) = members.next().await? {
            session.joined_users.push(row.get::<i64>(0)?);
        }

        Ok(Some(session))
    }

    /// All sessions in creation order, with member lists.
    pub async fn list_sessions(&self) -> Result<Vec<StudySession>, DatabaseError> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM {} ORDER BY id",
            tables::STUDY_SESSIONS
        );
        let mut rows = self.conn.query(&sql, ()).await?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            sessions.push(row_to_session(&row)?);
        }

        let sql = format!(
            "SELECT session_id, user_id FROM {} ORDER BY position",
            tables::SESSION_MEMBERS
        );
        let mut members: HashMap<i64, Vec<i64>> = HashMap::new();
        let mut rows = self.conn.query(&sql, ()).await?;
        while let Some(row) = rows.next().await? {
            members
                .entry(row.get::<i64>(0)?)
                .or_default()
                .push(row.get::<i64>(1)?);
        }

        for session in &mut sessions {
            session.joined_users = members.remove(&session.id).unwrap_or_default();
        }
        Ok(sessions)
    }

    /// Append `user_id` to a session's members.
    ///
    /// Returns `None` without writing anything if the session does not exist.
    /// The existence check and the append are one statement, so concurrent
    /// joins never overwrite each other. Repeat joins are recorded again.
    pub async fn join_session(
        &self,
        session_id: i64,
        user_id: i64,
    ) -> Result<Option<StudySession>, DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (session_id, user_id) SELECT id, ?2 FROM {} WHERE id = ?1",
            tables::SESSION_MEMBERS,
            tables::STUDY_SESSIONS
        );
        let inserted = self
            .conn
            .execute(&sql, libsql::params![session_id, user_id])
            .await?;

        if inserted == 0 {
            tracing::debug!(session_id, user_id, "Join requested for unknown session");
            return Ok(None);
        }

        self.get_session(session_id).await
    }
}

// ─── Row Mapping ─────────────────────────────────────────────

fn row_to_spot(row: &libsql::Row) -> Result<Spot, DatabaseError> {
    let category: String = row.get(2)?;
    Ok(Spot {
        id: row.get(0)?,
        name: row.get(1)?,
        category: category.parse().map_err(DatabaseError::InvalidRow)?,
        location: row.get(3)?,
        activity: row.get::<Option<String>>(4)?,
        hours: row.get::<Option<String>>(5)?,
        noise_level: row.get::<Option<String>>(6)?,
        seating: row.get::<Option<String>>(7)?,
        amenities: row.get::<Option<String>>(8)?,
    })
}

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    let prefs_json: String = row.get(3)?;
    let preferences = serde_json::from_str(&prefs_json)
        .map_err(|e| DatabaseError::InvalidRow(format!("preferences: {e}")))?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        preferences,
        created_at: row.get(4)?,
    })
}

/// Session columns only; members are filled in by the caller.
fn row_to_session(row: &libsql::Row) -> Result<StudySession, DatabaseError> {
    Ok(StudySession {
        id: row.get(0)?,
        subject: row.get(1)?,
        spot_id: row.get::<Option<i64>>(2)?,
        user_id: row.get(3)?,
        joined_users: Vec::new(),
        created_at: row.get(4)?,
    })
}
