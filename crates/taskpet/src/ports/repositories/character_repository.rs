//! Character Repository Port
//!
//! Persistence interface for characters. Feeding is a compound
//! operation here because the food debit and the bond credit must be
//! serialized and atomic: implementations run it as a single
//! transaction with the character row locked for the duration.
//! Experience grants go through the task ledger, never through this
//! port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{Character, FeedOutcome, User};
use crate::domain::errors::DomainError;
use crate::domain::services::progression::FeedConfig;

#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// Find a character by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Character>, DomainError>;

    /// Find the character the user is currently raising, if any
    async fn find_active_for_user(&self, user_id: Uuid) -> Result<Option<Character>, DomainError>;

    /// Insert a new character
    async fn insert(&self, character: &Character) -> Result<Character, DomainError>;

    /// Persist a modified character
    async fn save(&self, character: &Character) -> Result<Character, DomainError>;

    /// Feed the user's active character: one transaction over the food
    /// debit and the bond credit.
    async fn feed_active(
        &self,
        user_id: Uuid,
        config: &FeedConfig,
    ) -> Result<Option<FeedOutcome>, DomainError>;

    /// All alive characters currently active for some user (decay job)
    async fn find_active_alive(&self) -> Result<Vec<Character>, DomainError>;

    /// Active alive characters sitting exactly at `bond`, with their
    /// owners (low-bond alert job)
    async fn find_active_with_bond(&self, bond: i32)
        -> Result<Vec<(User, Character)>, DomainError>;

    /// Active characters that died within the window, with their owners
    /// (death notice job)
    async fn find_dead_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(User, Character)>, DomainError>;
}
