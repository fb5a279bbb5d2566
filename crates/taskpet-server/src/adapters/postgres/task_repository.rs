//! PostgreSQL implementation of TaskRepository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskpet::{
    Difficulty, DomainError, TargetPeriod, TargetUnit, Task, TaskKind, TaskRepository, TaskStatus,
    TrackingMode,
};

pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
pub(crate) struct TaskRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub kind: i16,
    pub status: i16,
    pub tracking_mode: Option<i16>,
    pub difficulty: i16,
    pub reward_exp: i32,
    pub reward_food_count: i32,
    pub target_value: Option<f64>,
    pub target_unit: Option<i16>,
    pub target_period: Option<i16>,
    pub due_on: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub tag: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = DomainError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            kind: TaskKind::try_from(row.kind).map_err(DomainError::Repository)?,
            status: TaskStatus::try_from(row.status).map_err(DomainError::Repository)?,
            tracking_mode: row
                .tracking_mode
                .map(TrackingMode::try_from)
                .transpose()
                .map_err(DomainError::Repository)?,
            difficulty: Difficulty::try_from(row.difficulty).map_err(DomainError::Repository)?,
            reward_exp: row.reward_exp,
            reward_food_count: row.reward_food_count,
            target_value: row.target_value,
            target_unit: row
                .target_unit
                .map(TargetUnit::try_from)
                .transpose()
                .map_err(DomainError::Repository)?,
            target_period: row
                .target_period
                .map(TargetPeriod::try_from)
                .transpose()
                .map_err(DomainError::Repository)?,
            due_on: row.due_on,
            completed_at: row.completed_at,
            tag: row.tag,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, DomainError> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, DomainError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT * FROM tasks WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn insert(&self, task: &Task) -> Result<Task, DomainError> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO tasks
                (id, user_id, title, kind, status, tracking_mode, difficulty,
                 reward_exp, reward_food_count, target_value, target_unit,
                 target_period, due_on, completed_at, tag)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(task.id)
        .bind(task.user_id)
        .bind(&task.title)
        .bind(task.kind.as_i16())
        .bind(task.status.as_i16())
        .bind(task.tracking_mode.map(TrackingMode::as_i16))
        .bind(task.difficulty.as_i16())
        .bind(task.reward_exp)
        .bind(task.reward_food_count)
        .bind(task.target_value)
        .bind(task.target_unit.map(TargetUnit::as_i16))
        .bind(task.target_period.map(TargetPeriod::as_i16))
        .bind(task.due_on)
        .bind(task.completed_at)
        .bind(&task.tag)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.try_into()
    }

    async fn save(&self, task: &Task) -> Result<Task, DomainError> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks
            SET title = $2, kind = $3, status = $4, tracking_mode = $5,
                difficulty = $6, reward_exp = $7, reward_food_count = $8,
                target_value = $9, target_unit = $10, target_period = $11,
                due_on = $12, completed_at = $13, tag = $14, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(task.kind.as_i16())
        .bind(task.status.as_i16())
        .bind(task.tracking_mode.map(TrackingMode::as_i16))
        .bind(task.difficulty.as_i16())
        .bind(task.reward_exp)
        .bind(task.reward_food_count)
        .bind(task.target_value)
        .bind(task.target_unit.map(TargetUnit::as_i16))
        .bind(task.target_period.map(TargetPeriod::as_i16))
        .bind(task.due_on)
        .bind(task.completed_at)
        .bind(&task.tag)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_open_due_on(&self, date: NaiveDate) -> Result<Vec<Task>, DomainError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT * FROM tasks WHERE due_on = $1 AND status = $2 ORDER BY user_id",
        )
        .bind(date)
        .bind(TaskStatus::Open.as_i16())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn reset_done_checkbox_habits(&self, before: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET status = $1, completed_at = NULL, updated_at = NOW()
            WHERE kind = $2 AND tracking_mode = $3 AND status = $4 AND completed_at < $5
            "#,
        )
        .bind(TaskStatus::Open.as_i16())
        .bind(TaskKind::Habit.as_i16())
        .bind(TrackingMode::Checkbox.as_i16())
        .bind(TaskStatus::Done.as_i16())
        .bind(before)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
