//! Task Application Service (Use Case)
//!
//! CRUD over tasks. Creation appends the `created` audit event through
//! the ledger; difficulty edits recompute the experience reward.

use std::sync::Arc;
use uuid::Uuid;

use chrono::NaiveDate;
use taskpet::{
    Difficulty, DomainError, TargetPeriod, TargetUnit, Task, TaskKind, TaskLedger, TaskRepository,
    TrackingMode,
};

/// Fields accepted when creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub kind: TaskKind,
    pub tracking_mode: Option<TrackingMode>,
    pub difficulty: Difficulty,
    pub target_value: Option<f64>,
    pub target_unit: Option<TargetUnit>,
    pub target_period: Option<TargetPeriod>,
    pub due_on: Option<NaiveDate>,
    pub tag: Option<String>,
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub target_value: Option<Option<f64>>,
    pub target_unit: Option<Option<TargetUnit>>,
    pub target_period: Option<Option<TargetPeriod>>,
    pub due_on: Option<Option<NaiveDate>>,
    pub tag: Option<Option<String>>,
}

pub struct TaskService<R, L>
where
    R: TaskRepository,
    L: TaskLedger,
{
    tasks: Arc<R>,
    ledger: Arc<L>,
}

impl<R, L> TaskService<R, L>
where
    R: TaskRepository,
    L: TaskLedger,
{
    pub fn new(tasks: Arc<R>, ledger: Arc<L>) -> Self {
        Self { tasks, ledger }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, DomainError> {
        self.tasks.find_for_user(user_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Task>, DomainError> {
        self.tasks.find_by_id(id).await
    }

    pub async fn create(&self, user_id: Uuid, new: NewTask) -> Result<Task, DomainError> {
        let mut task = Task::new(user_id, new.title, new.kind, new.tracking_mode, new.difficulty);
        task.target_value = new.target_value;
        task.target_unit = new.target_unit;
        task.target_period = new.target_period;
        task.due_on = new.due_on;
        task.tag = new.tag;
        task.validate()?;

        let saved = self.tasks.insert(&task).await?;
        self.ledger.log_created(saved.id, user_id).await?;

        tracing::info!(task_id = %saved.id, kind = %saved.kind, "task created");
        Ok(saved)
    }

    pub async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task, DomainError> {
        let mut task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Task", id))?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(difficulty) = patch.difficulty {
            task.set_difficulty(difficulty);
        }
        if let Some(target_value) = patch.target_value {
            task.target_value = target_value;
        }
        if let Some(target_unit) = patch.target_unit {
            task.target_unit = target_unit;
        }
        if let Some(target_period) = patch.target_period {
            task.target_period = target_period;
        }
        if let Some(due_on) = patch.due_on {
            task.due_on = due_on;
        }
        if let Some(tag) = patch.tag {
            task.tag = tag;
        }
        task.validate()?;

        self.tasks.save(&task).await
    }

    /// Delete a task; its event history cascades with it.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = self.tasks.delete(id).await?;
        if deleted {
            tracing::info!(task_id = %id, "task deleted");
        }
        Ok(deleted)
    }
}
