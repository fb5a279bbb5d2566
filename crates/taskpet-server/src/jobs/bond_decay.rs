//! Bond Decay Job
//!
//! Once per day every active alive character loses bond; characters
//! whose owners have been inactive past the configured window lose
//! extra. A character that hits 0 bond dies. The job takes `now` so a
//! failed run can be replayed for the same tick.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use taskpet::{CharacterRepository, DecayConfig, DomainError};

pub struct BondDecayJob<C: CharacterRepository> {
    characters: Arc<C>,
    config: DecayConfig,
}

impl<C: CharacterRepository> BondDecayJob<C> {
    pub fn new(characters: Arc<C>) -> Self {
        Self::with_config(characters, DecayConfig::default())
    }

    pub fn with_config(characters: Arc<C>, config: DecayConfig) -> Self {
        Self { characters, config }
    }

    /// Returns how many characters were processed. Per-character save
    /// failures abort the run; the next tick picks up from current
    /// state since decay is based on stored bond, not history.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let characters = self.characters.find_active_alive().await?;
        let processed = characters.len();

        for mut character in characters {
            let amount = self.config.decay_amount(character.last_activity_at, now);
            let starved = character.apply_bond_decay(amount);
            if starved {
                character.die(now);
                tracing::info!(character_id = %character.id, "character starved");
            }
            self.characters.save(&character).await?;
        }

        tracing::info!(processed, "bond decay tick finished");
        Ok(processed)
    }
}
