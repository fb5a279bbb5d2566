//! Task Ledger Port
//!
//! The transactional completion workflow: each operation flips task
//! state, credits/debits the user's food, grants or reverses experience
//! on the active character, and appends exactly one immutable event -
//! all within one transaction. A crash partway must never leave a task
//! marked done without its event and reward, or vice versa.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Task, TaskEvent};
use crate::domain::errors::DomainError;

#[async_trait]
pub trait TaskLedger: Send + Sync {
    /// Append a `created` audit event. No reward side effects.
    async fn log_created(&self, task_id: Uuid, user_id: Uuid) -> Result<TaskEvent, DomainError>;

    /// Complete a todo or checkbox habit: status -> done, food credited,
    /// experience granted to the active character (unless `award_exp` is
    /// false), `completed` event appended. Log-mode habits are a usage
    /// error - they must go through `log_amount`.
    async fn complete(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        award_exp: bool,
    ) -> Result<Task, DomainError>;

    /// Reopen a done task: status -> open, optionally reversing the
    /// experience and food rewards (food clamped at 0). Appends a
    /// `reopened` event. No-op if already open.
    async fn reopen(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        revert_exp: bool,
        revert_food: bool,
    ) -> Result<Task, DomainError>;

    /// Record a quantity against a log-mode habit: food credited,
    /// experience granted, `logged` event appended with the amount and
    /// unit (defaulting to the task's target unit). Task status is not
    /// touched. Any other task is a usage error.
    async fn log_amount(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        amount: f64,
        unit: Option<String>,
    ) -> Result<Task, DomainError>;
}
