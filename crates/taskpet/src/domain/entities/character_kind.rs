//! CharacterKind - master data describing a pet template
//!
//! An (asset_key, stage) pair with a display name. Three kinds typically
//! share an asset_key: the egg, child and adult variants of one creature
//! line. Seeded once, looked up at runtime, never created by users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Stage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterKind {
    pub id: Uuid,
    pub name: String,
    pub asset_key: String,
    pub stage: Stage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CharacterKind {
    pub fn new(asset_key: impl Into<String>, stage: Stage, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            asset_key: asset_key.into(),
            stage,
            created_at: now,
            updated_at: now,
        }
    }
}
