//! Push Notification Jobs
//!
//! Reminder and alert texts pushed to users who linked a messaging
//! account. Delivery failures are logged per user and never abort the
//! batch.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use taskpet::{
    CharacterRepository, DomainError, PushNotifier, Task, TaskRepository, UserRepository,
};
use uuid::Uuid;

/// Bond value at which the hunger alert fires. Exactly one decay tick
/// away from death at default decay.
pub const LOW_BOND: i32 = 10;

/// "These tasks are due tomorrow" reminder, one message per user.
pub struct DueTomorrowReminderJob<R, U, P>
where
    R: TaskRepository,
    U: UserRepository,
    P: PushNotifier,
{
    tasks: Arc<R>,
    users: Arc<U>,
    notifier: Arc<P>,
}

impl<R, U, P> DueTomorrowReminderJob<R, U, P>
where
    R: TaskRepository,
    U: UserRepository,
    P: PushNotifier,
{
    pub fn new(tasks: Arc<R>, users: Arc<U>, notifier: Arc<P>) -> Self {
        Self {
            tasks,
            users,
            notifier,
        }
    }

    /// Returns how many users were messaged.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let tomorrow = now.date_naive() + Duration::days(1);
        let due = self.tasks.find_open_due_on(tomorrow).await?;

        let mut by_user: HashMap<Uuid, Vec<Task>> = HashMap::new();
        for task in due {
            by_user.entry(task.user_id).or_default().push(task);
        }

        let mut sent = 0;
        for (user_id, tasks) in by_user {
            let Some(user) = self.users.find_by_id(user_id).await? else {
                continue;
            };
            let Some(messaging_id) = user.messaging_id.as_deref() else {
                continue;
            };

            let mut text = format!(
                "⏰ These tasks are due tomorrow.\n\nDue: {}\n",
                tomorrow.format("%Y-%m-%d")
            );
            for (i, task) in tasks.iter().enumerate() {
                text.push_str(&format!("{}. {}\n", i + 1, task.title));
            }

            match self.notifier.send(messaging_id, text.trim_end()).await {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!(user_id = %user_id, "due reminder failed: {e}"),
            }
        }

        tracing::info!(sent, "due-tomorrow reminders finished");
        Ok(sent)
    }
}

/// Hunger warning for pets sitting exactly at the low-bond threshold.
pub struct LowBondAlertJob<C, P>
where
    C: CharacterRepository,
    P: PushNotifier,
{
    characters: Arc<C>,
    notifier: Arc<P>,
}

impl<C, P> LowBondAlertJob<C, P>
where
    C: CharacterRepository,
    P: PushNotifier,
{
    pub fn new(characters: Arc<C>, notifier: Arc<P>) -> Self {
        Self {
            characters,
            notifier,
        }
    }

    pub async fn run(&self) -> Result<usize, DomainError> {
        let hungry = self.characters.find_active_with_bond(LOW_BOND).await?;

        let mut sent = 0;
        for (user, _character) in hungry {
            let Some(messaging_id) = user.messaging_id.as_deref() else {
                continue;
            };

            let text = "🚨 Your pet is getting hungry\n\nFeed it soon. 🍚";
            match self.notifier.send(messaging_id, text).await {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!(user_id = %user.id, "low-bond alert failed: {e}"),
            }
        }

        tracing::info!(sent, "low-bond alerts finished");
        Ok(sent)
    }
}

/// Condolence notice for pets that died within the last day.
pub struct DeathNoticeJob<C, P>
where
    C: CharacterRepository,
    P: PushNotifier,
{
    characters: Arc<C>,
    notifier: Arc<P>,
}

impl<C, P> DeathNoticeJob<C, P>
where
    C: CharacterRepository,
    P: PushNotifier,
{
    pub fn new(characters: Arc<C>, notifier: Arc<P>) -> Self {
        Self {
            characters,
            notifier,
        }
    }

    pub async fn run(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let died = self
            .characters
            .find_dead_between(now - Duration::days(1), now)
            .await?;

        let mut sent = 0;
        for (user, _character) in died {
            let Some(messaging_id) = user.messaging_id.as_deref() else {
                continue;
            };

            let text = "🕊️ Your pet has passed away.\n\n⚠️ Remember to feed the next one regularly";
            match self.notifier.send(messaging_id, text).await {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!(user_id = %user.id, "death notice failed: {e}"),
            }
        }

        tracing::info!(sent, "death notices finished");
        Ok(sent)
    }
}
