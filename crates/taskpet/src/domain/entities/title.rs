//! Title - master achievement definition, and the per-user unlock record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::TitleRule;

/// An achievement badge. Unlocked at most once per user when its
/// threshold is crossed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Title {
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub rule: TitleRule,
    pub threshold: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Title {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        rule: TitleRule,
        threshold: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            name: name.into(),
            description: None,
            rule,
            threshold,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Join record: `user` unlocked `title` at `unlocked_at`. Unique per
/// (user, title) - the database constraint is the authoritative guard
/// against double awards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTitle {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title_id: Uuid,
    pub unlocked_at: DateTime<Utc>,
}

impl UserTitle {
    pub fn new(user_id: Uuid, title_id: Uuid, unlocked_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title_id,
            unlocked_at,
        }
    }
}
