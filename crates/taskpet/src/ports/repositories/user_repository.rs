//! User Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::domain::errors::DomainError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    async fn insert(&self, user: &User) -> Result<User, DomainError>;

    async fn save(&self, user: &User) -> Result<User, DomainError>;

    /// Repoint the active-character pointer (signup and reset)
    async fn set_active_character(
        &self,
        user_id: Uuid,
        character_id: Uuid,
    ) -> Result<(), DomainError>;
}
