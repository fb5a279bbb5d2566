//! TaskEvent - immutable, append-only ledger entry
//!
//! Each mutation of a task appends one event. The `task_kind` field is a
//! snapshot of the task's kind at event time, deliberately decoupled from
//! later task edits, and `delta` encodes the net completion-count
//! contribution (+1 completed, -1 reopened, 0 otherwise) so that summing
//! deltas yields current completion counts without scanning task rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Task;
use crate::domain::value_objects::{EventAction, TaskKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task_id: Uuid,
    /// Character that received (or lost) the experience, if any.
    /// Preserved even if the user's active character changes later.
    pub awarded_character_id: Option<Uuid>,
    pub task_kind: TaskKind,
    pub action: EventAction,
    pub delta: i32,
    pub amount: f64,
    pub unit: Option<String>,
    pub xp_amount: i32,
    pub occurred_at: DateTime<Utc>,
}

impl TaskEvent {
    fn base(task: &Task, user_id: Uuid, action: EventAction, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            task_id: task.id,
            awarded_character_id: None,
            task_kind: task.kind,
            action,
            delta: 0,
            amount: 0.0,
            unit: None,
            xp_amount: 0,
            occurred_at: now,
        }
    }

    /// Audit record for task creation; no reward side effects.
    pub fn created(task: &Task, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self::base(task, user_id, EventAction::Created, now)
    }

    pub fn completed(
        task: &Task,
        user_id: Uuid,
        awarded_character_id: Option<Uuid>,
        xp_amount: i32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            awarded_character_id,
            delta: 1,
            xp_amount,
            ..Self::base(task, user_id, EventAction::Completed, now)
        }
    }

    pub fn reopened(
        task: &Task,
        user_id: Uuid,
        awarded_character_id: Option<Uuid>,
        xp_reverted: i32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            awarded_character_id,
            delta: -1,
            xp_amount: -xp_reverted,
            ..Self::base(task, user_id, EventAction::Reopened, now)
        }
    }

    /// Quantity entry for a log-mode habit. Logging never changes a
    /// completion counter, so delta stays 0.
    pub fn logged(
        task: &Task,
        user_id: Uuid,
        awarded_character_id: Option<Uuid>,
        amount: f64,
        unit: Option<String>,
        xp_amount: i32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            awarded_character_id,
            amount,
            unit,
            xp_amount,
            ..Self::base(task, user_id, EventAction::Logged, now)
        }
    }
}
