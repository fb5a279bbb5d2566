//! PostgreSQL implementation of TaskEventRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskpet::{DomainError, EventAction, TaskEvent, TaskEventRepository, TaskKind};

pub struct PgTaskEventRepository {
    pool: PgPool,
}

impl PgTaskEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
pub(crate) struct TaskEventRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task_id: Uuid,
    pub awarded_character_id: Option<Uuid>,
    pub task_kind: i16,
    pub action: i16,
    pub delta: i32,
    pub amount: f64,
    pub unit: Option<String>,
    pub xp_amount: i32,
    pub occurred_at: DateTime<Utc>,
}

impl TryFrom<TaskEventRow> for TaskEvent {
    type Error = DomainError;

    fn try_from(row: TaskEventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            task_id: row.task_id,
            awarded_character_id: row.awarded_character_id,
            task_kind: TaskKind::try_from(row.task_kind).map_err(DomainError::Repository)?,
            action: EventAction::try_from(row.action).map_err(DomainError::Repository)?,
            delta: row.delta,
            amount: row.amount,
            unit: row.unit,
            xp_amount: row.xp_amount,
            occurred_at: row.occurred_at,
        })
    }
}

#[async_trait]
impl TaskEventRepository for PgTaskEventRepository {
    async fn append(&self, event: &TaskEvent) -> Result<TaskEvent, DomainError> {
        let row = sqlx::query_as::<_, TaskEventRow>(
            r#"
            INSERT INTO task_events
                (id, user_id, task_id, awarded_character_id, task_kind, action,
                 delta, amount, unit, xp_amount, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(event.task_id)
        .bind(event.awarded_character_id)
        .bind(event.task_kind.as_i16())
        .bind(event.action.as_i16())
        .bind(event.delta)
        .bind(event.amount)
        .bind(&event.unit)
        .bind(event.xp_amount)
        .bind(event.occurred_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.try_into()
    }

    async fn completed_delta_sum(
        &self,
        user_id: Uuid,
        kind: TaskKind,
    ) -> Result<i64, DomainError> {
        let sum = sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT SUM(delta) FROM task_events
            WHERE user_id = $1 AND action = $2 AND task_kind = $3
            "#,
        )
        .bind(user_id)
        .bind(EventAction::Completed.as_i16())
        .bind(kind.as_i16())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(sum.unwrap_or(0))
    }
}
