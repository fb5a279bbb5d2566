//! TaskEvent Repository Port
//!
//! The ledger is append-only; events are never updated or deleted except
//! by cascading task/user deletion.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::TaskEvent;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::TaskKind;

#[async_trait]
pub trait TaskEventRepository: Send + Sync {
    async fn append(&self, event: &TaskEvent) -> Result<TaskEvent, DomainError>;

    /// Sum of `delta` over `completed` events of the given task-kind
    /// snapshot. Gross completion count: reopens are not subtracted
    /// (title rules evaluate completions, not net state).
    async fn completed_delta_sum(
        &self,
        user_id: Uuid,
        kind: TaskKind,
    ) -> Result<i64, DomainError>;
}
