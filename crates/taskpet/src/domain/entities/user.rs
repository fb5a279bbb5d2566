//! User - owner of tasks and characters
//!
//! Authentication lives outside the engine; the engine only needs the
//! food balance, the active-character pointer and the optional external
//! messaging identity used by the notification jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub food_count: i32,
    /// The one character currently being raised. Null means rewards have
    /// no recipient, which is not an error.
    pub active_character_id: Option<Uuid>,
    /// External push-messaging identity (e.g. a LINE user id).
    pub messaging_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            food_count: 0,
            active_character_id: None,
            messaging_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}
