//! Task Repository Port

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::entities::Task;
use crate::domain::errors::DomainError;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, DomainError>;

    async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, DomainError>;

    async fn insert(&self, task: &Task) -> Result<Task, DomainError>;

    async fn save(&self, task: &Task) -> Result<Task, DomainError>;

    /// Delete a task; its event history cascades
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Open tasks due on a given date (reminder job)
    async fn find_open_due_on(&self, date: NaiveDate) -> Result<Vec<Task>, DomainError>;

    /// Reopen done checkbox habits completed before the cutoff, returning
    /// how many were reset. Idempotent: already-open habits are untouched.
    async fn reset_done_checkbox_habits(&self, before: DateTime<Utc>) -> Result<u64, DomainError>;
}
