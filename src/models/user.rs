//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Free-form user preferences (a JSON object).
pub type Preferences = serde_json::Map<String, serde_json::Value>;

/// User account stored in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// PBKDF2 hash string, never the raw password
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(default)]
    pub preferences: Preferences,
    /// When the account was created (RFC 3339)
    pub created_at: String,
}
