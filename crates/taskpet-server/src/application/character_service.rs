//! Character Application Service (Use Case)
//!
//! Lifecycle of the user's pet: the initial egg at signup, the reset
//! flow after a death (old character rows are kept as history), and
//! feeding. Feeding outcomes are business results, not errors.

use std::sync::Arc;
use uuid::Uuid;

use taskpet::{
    Character, CharacterKindRepository, CharacterRepository, DomainError, FeedConfig, FeedOutcome,
    Stage, UserRepository,
};

pub struct CharacterService<C, K, U>
where
    C: CharacterRepository,
    K: CharacterKindRepository,
    U: UserRepository,
{
    characters: Arc<C>,
    kinds: Arc<K>,
    users: Arc<U>,
    feed_config: FeedConfig,
}

impl<C, K, U> CharacterService<C, K, U>
where
    C: CharacterRepository,
    K: CharacterKindRepository,
    U: UserRepository,
{
    pub fn new(characters: Arc<C>, kinds: Arc<K>, users: Arc<U>) -> Self {
        Self::with_config(characters, kinds, users, FeedConfig::default())
    }

    pub fn with_config(
        characters: Arc<C>,
        kinds: Arc<K>,
        users: Arc<U>,
        feed_config: FeedConfig,
    ) -> Self {
        Self {
            characters,
            kinds,
            users,
            feed_config,
        }
    }

    /// The pet the user is currently raising
    pub async fn active(&self, user_id: Uuid) -> Result<Option<Character>, DomainError> {
        self.characters.find_active_for_user(user_id).await
    }

    /// Give a fresh user their first egg and point them at it.
    pub async fn create_initial(&self, user_id: Uuid) -> Result<Character, DomainError> {
        self.spawn_egg(user_id).await
    }

    /// Start over with a new egg. The previous character row stays in
    /// the table as history; only the active pointer moves.
    pub async fn reset(&self, user_id: Uuid) -> Result<Character, DomainError> {
        let character = self.spawn_egg(user_id).await?;
        tracing::info!(user_id = %user_id, character_id = %character.id, "character reset");
        Ok(character)
    }

    /// Spend food to restore bond. `BondFull` and `NotEnoughFood` are
    /// outcomes the UI explains, not failures.
    pub async fn feed(&self, user_id: Uuid) -> Result<FeedOutcome, DomainError> {
        let outcome = self
            .characters
            .feed_active(user_id, &self.feed_config)
            .await?
            .ok_or_else(|| DomainError::Usage("no active character to feed".into()))?;

        Ok(outcome)
    }

    async fn spawn_egg(&self, user_id: Uuid) -> Result<Character, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        let egg_kind = self
            .kinds
            .find_by_asset_key_and_stage("egg", Stage::Egg)
            .await?
            .ok_or_else(|| DomainError::Repository("egg kind is not seeded".into()))?;

        let character = self
            .characters
            .insert(&Character::new_egg(user.id, &egg_kind))
            .await?;
        self.users.set_active_character(user.id, character.id).await?;

        Ok(character)
    }
}
