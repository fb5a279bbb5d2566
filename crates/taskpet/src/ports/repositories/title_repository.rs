//! Title Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Title, UserTitle};
use crate::domain::errors::DomainError;

#[async_trait]
pub trait TitleRepository: Send + Sync {
    /// All titles currently eligible for unlocking
    async fn find_active(&self) -> Result<Vec<Title>, DomainError>;

    /// IDs of titles the user has already unlocked
    async fn unlocked_title_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError>;

    /// Record an unlock. Returns false when the (user, title) pair was
    /// already present: the unique constraint is the authoritative race
    /// guard, and a duplicate grant degrades to "nothing new".
    async fn try_unlock(&self, unlock: &UserTitle) -> Result<bool, DomainError>;

    /// Idempotent seed insert keyed on the title key
    async fn insert_if_missing(&self, title: &Title) -> Result<Title, DomainError>;
}
