//! Title Unlocker (Use Case)
//!
//! Evaluates every active title the user has not yet unlocked and
//! records the ones whose rule is now satisfied. Completion counts are
//! gross: summing `delta` over `completed` events only, so reopening a
//! task never takes an earned title back.

use std::sync::Arc;
use uuid::Uuid;

use taskpet::{
    CharacterRepository, DomainError, TaskEventRepository, TaskKind, Title, TitleRepository,
    TitleRule, UserTitle,
};

pub struct TitleUnlocker<E, C, T>
where
    E: TaskEventRepository,
    C: CharacterRepository,
    T: TitleRepository,
{
    events: Arc<E>,
    characters: Arc<C>,
    titles: Arc<T>,
}

impl<E, C, T> TitleUnlocker<E, C, T>
where
    E: TaskEventRepository,
    C: CharacterRepository,
    T: TitleRepository,
{
    pub fn new(events: Arc<E>, characters: Arc<C>, titles: Arc<T>) -> Self {
        Self {
            events,
            characters,
            titles,
        }
    }

    /// Unlock every newly satisfied title for the user, returning the
    /// titles unlocked by this call. A concurrent duplicate grant loses
    /// the unique-constraint race and is simply not reported.
    pub async fn unlock_for(&self, user_id: Uuid) -> Result<Vec<Title>, DomainError> {
        let active = self.titles.find_active().await?;
        let unlocked = self.titles.unlocked_title_ids(user_id).await?;

        let mut newly_unlocked = Vec::new();
        for title in active {
            if unlocked.contains(&title.id) {
                continue;
            }
            if !self.satisfied(user_id, &title).await? {
                continue;
            }

            let grant = UserTitle::new(user_id, title.id, chrono::Utc::now());
            if self.titles.try_unlock(&grant).await? {
                tracing::info!(user_id = %user_id, title = %title.key, "title unlocked");
                newly_unlocked.push(title);
            }
        }

        Ok(newly_unlocked)
    }

    async fn satisfied(&self, user_id: Uuid, title: &Title) -> Result<bool, DomainError> {
        match title.rule {
            TitleRule::TodoCompletion => {
                let count = self
                    .events
                    .completed_delta_sum(user_id, TaskKind::Todo)
                    .await?;
                Ok(count >= title.threshold)
            }
            TitleRule::HabitCompletion => {
                let count = self
                    .events
                    .completed_delta_sum(user_id, TaskKind::Habit)
                    .await?;
                Ok(count >= title.threshold)
            }
            TitleRule::PetLevel => {
                let character = self.characters.find_active_for_user(user_id).await?;
                Ok(character.is_some_and(|c| i64::from(c.level) >= title.threshold))
            }
        }
    }
}
