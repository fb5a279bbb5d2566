//! Daily Habit Reset Job
//!
//! Checkbox habits completed on a previous day flip back to open so
//! they can be done again today. Log habits and todos are untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use taskpet::{DomainError, TaskRepository};

pub struct HabitResetJob<R: TaskRepository> {
    tasks: Arc<R>,
}

impl<R: TaskRepository> HabitResetJob<R> {
    pub fn new(tasks: Arc<R>) -> Self {
        Self { tasks }
    }

    /// Reopen done checkbox habits completed before the start of the
    /// day containing `now`. Safe to re-run: already-open habits are
    /// skipped by the repository query.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let start_of_day = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or(now);

        let reset = self.tasks.reset_done_checkbox_habits(start_of_day).await?;
        tracing::info!(reset, "daily habit reset finished");
        Ok(reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{shared, MemTaskRepository};
    use chrono::Duration;
    use taskpet::{Difficulty, Task, TaskKind, TaskStatus, TrackingMode};
    use uuid::Uuid;

    fn done_habit(mode: TrackingMode, completed_at: chrono::DateTime<Utc>) -> Task {
        let mut task = Task::new(
            Uuid::new_v4(),
            "stretch",
            TaskKind::Habit,
            Some(mode),
            Difficulty::Easy,
        );
        task.status = TaskStatus::Done;
        task.completed_at = Some(completed_at);
        task
    }

    #[tokio::test]
    async fn test_resets_yesterdays_checkbox_habits_only() {
        let world = shared();
        let now = Utc::now();
        let yesterday = done_habit(TrackingMode::Checkbox, now - Duration::days(1));
        let today = done_habit(TrackingMode::Checkbox, now);
        let log_habit = done_habit(TrackingMode::Log, now - Duration::days(1));
        {
            let mut state = world.lock().unwrap();
            for t in [&yesterday, &today, &log_habit] {
                state.tasks.insert(t.id, (*t).clone());
            }
        }

        let reset = HabitResetJob::new(Arc::new(MemTaskRepository(world.clone())))
            .run(now)
            .await
            .unwrap();

        assert_eq!(reset, 1);
        let state = world.lock().unwrap();
        let reopened = state.tasks.get(&yesterday.id).unwrap();
        assert!(reopened.is_open());
        assert!(reopened.completed_at.is_none());
        assert!(state.tasks.get(&today.id).unwrap().is_done());
        assert!(state.tasks.get(&log_habit.id).unwrap().is_done());
    }

    #[tokio::test]
    async fn test_rerun_is_a_no_op() {
        let world = shared();
        let now = Utc::now();
        let habit = done_habit(TrackingMode::Checkbox, now - Duration::days(1));
        world.lock().unwrap().tasks.insert(habit.id, habit.clone());
        let job = HabitResetJob::new(Arc::new(MemTaskRepository(world.clone())));

        assert_eq!(job.run(now).await.unwrap(), 1);
        assert_eq!(job.run(now).await.unwrap(), 0);
    }
}
