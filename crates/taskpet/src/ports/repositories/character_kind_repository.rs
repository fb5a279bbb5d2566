//! CharacterKind Repository Port
//!
//! Lookup interface for the pet master data. Kinds are seeded once and
//! never created at runtime.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::CharacterKind;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::Stage;

#[async_trait]
pub trait CharacterKindRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CharacterKind>, DomainError>;

    async fn find_all(&self) -> Result<Vec<CharacterKind>, DomainError>;

    /// The adult/child/egg variant of a specific asset line
    async fn find_by_asset_key_and_stage(
        &self,
        asset_key: &str,
        stage: Stage,
    ) -> Result<Option<CharacterKind>, DomainError>;

    /// Idempotent seed insert keyed on (asset_key, stage)
    async fn insert_if_missing(&self, kind: &CharacterKind) -> Result<CharacterKind, DomainError>;
}
