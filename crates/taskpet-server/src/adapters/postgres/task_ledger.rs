//! PostgreSQL implementation of TaskLedger
//!
//! Every operation here is a single transaction: the task row is locked
//! first, then the owner (for the food balance) and the active character
//! (for the experience grant), and exactly one event row is appended
//! before commit. Partial reward states cannot survive a crash.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use taskpet::{DomainError, Task, TaskEvent, TaskLedger, TaskStatus};

use super::progression_sql;
use super::task_event_repository::TaskEventRow;
use super::task_repository::TaskRow;

pub struct PgTaskLedger {
    pool: PgPool,
}

impl PgTaskLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn repo_err(e: sqlx::Error) -> DomainError {
    DomainError::Repository(e.to_string())
}

async fn lock_task(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
    user_id: Uuid,
) -> Result<Task, DomainError> {
    let row = sqlx::query_as::<_, TaskRow>(
        "SELECT * FROM tasks WHERE id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(task_id)
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(repo_err)?
    .ok_or_else(|| DomainError::not_found("Task", task_id))?;

    row.try_into()
}

async fn adjust_food(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    delta: i32,
) -> Result<(), DomainError> {
    if delta == 0 {
        return Ok(());
    }
    // GREATEST clamps reversal below zero; completions only add.
    sqlx::query(
        "UPDATE users SET food_count = GREATEST(food_count + $2, 0), updated_at = NOW() WHERE id = $1",
    )
    .bind(user_id)
    .bind(delta)
    .execute(&mut **tx)
    .await
    .map_err(repo_err)?;
    Ok(())
}

async fn persist_status(
    tx: &mut Transaction<'_, Postgres>,
    task: &Task,
) -> Result<Task, DomainError> {
    let row = sqlx::query_as::<_, TaskRow>(
        r#"
        UPDATE tasks
        SET status = $2, completed_at = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(task.id)
    .bind(task.status.as_i16())
    .bind(task.completed_at)
    .fetch_one(&mut **tx)
    .await
    .map_err(repo_err)?;

    row.try_into()
}

async fn append_event(
    tx: &mut Transaction<'_, Postgres>,
    event: &TaskEvent,
) -> Result<TaskEvent, DomainError> {
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
    .bind(event.unit.as_deref())
    .bind(event.xp_amount)
    .bind(event.occurred_at)
    .fetch_one(&mut **tx)
    .await
    .map_err(repo_err)?;

    row.try_into()
}

#[async_trait]
impl TaskLedger for PgTaskLedger {
    async fn log_created(&self, task_id: Uuid, user_id: Uuid) -> Result<TaskEvent, DomainError> {
        let mut tx = self.pool.begin().await.map_err(repo_err)?;

        let task = lock_task(&mut tx, task_id, user_id).await?;
        let event = append_event(&mut tx, &TaskEvent::created(&task, user_id, Utc::now())).await?;

        tx.commit().await.map_err(repo_err)?;
        Ok(event)
    }

    async fn complete(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        award_exp: bool,
    ) -> Result<Task, DomainError> {
        let mut tx = self.pool.begin().await.map_err(repo_err)?;

        let mut task = lock_task(&mut tx, task_id, user_id).await?;

        if !task.is_completable() {
            return Err(DomainError::Usage(
                "log habits are completed by logging amounts, not by checking off".into(),
            ));
        }
        if task.is_done() {
            return Err(DomainError::Conflict("task is already done".into()));
        }

        let now = Utc::now();
        task.status = TaskStatus::Done;
        task.completed_at = Some(now);

        adjust_food(&mut tx, user_id, task.reward_food_count).await?;

        // xp_amount records what was actually granted: it stays 0 when
        // no active character was there to receive the reward.
        let mut awarded_character_id = None;
        let mut xp_amount = 0;
        if award_exp && task.reward_exp > 0 {
            if let Some(mut character) =
                progression_sql::lock_active_character(&mut tx, user_id).await?
            {
                progression_sql::grant_exp_locked(&mut tx, &mut character, task.reward_exp as i64)
                    .await?;
                awarded_character_id = Some(character.id);
                xp_amount = task.reward_exp;
            }
        }

        let saved = persist_status(&mut tx, &task).await?;
        append_event(
            &mut tx,
            &TaskEvent::completed(&saved, user_id, awarded_character_id, xp_amount, now),
        )
        .await?;

        tx.commit().await.map_err(repo_err)?;
        Ok(saved)
    }

    async fn reopen(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        revert_exp: bool,
        revert_food: bool,
    ) -> Result<Task, DomainError> {
        let mut tx = self.pool.begin().await.map_err(repo_err)?;

        let mut task = lock_task(&mut tx, task_id, user_id).await?;

        if task.is_open() {
            return Ok(task);
        }

        let now = Utc::now();
        task.status = TaskStatus::Open;
        task.completed_at = None;

        if revert_food {
            adjust_food(&mut tx, user_id, -task.reward_food_count).await?;
        }

        // Mirrors complete: the event carries the exp actually taken
        // back, 0 when no active character exists.
        let mut awarded_character_id = None;
        let mut xp_reverted = 0;
        if revert_exp && task.reward_exp > 0 {
            if let Some(mut character) =
                progression_sql::lock_active_character(&mut tx, user_id).await?
            {
                progression_sql::revoke_exp_locked(&mut tx, &mut character, task.reward_exp as i64)
                    .await?;
                awarded_character_id = Some(character.id);
                xp_reverted = task.reward_exp;
            }
        }

        let saved = persist_status(&mut tx, &task).await?;
        append_event(
            &mut tx,
            &TaskEvent::reopened(&saved, user_id, awarded_character_id, xp_reverted, now),
        )
        .await?;

        tx.commit().await.map_err(repo_err)?;
        Ok(saved)
    }

    async fn log_amount(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        amount: f64,
        unit: Option<String>,
    ) -> Result<Task, DomainError> {
        let mut tx = self.pool.begin().await.map_err(repo_err)?;

        let task = lock_task(&mut tx, task_id, user_id).await?;

        if !task.is_log_habit() {
            return Err(DomainError::Usage(
                "only log habits accept amount entries".into(),
            ));
        }
        if amount <= 0.0 {
            return Err(DomainError::Validation("amount must be positive".into()));
        }

        let now = Utc::now();
        let unit = unit.or_else(|| task.target_unit.map(|u| u.to_string()));

        adjust_food(&mut tx, user_id, task.reward_food_count).await?;

        let mut awarded_character_id = None;
        let mut xp_amount = 0;
        if task.reward_exp > 0 {
            if let Some(mut character) =
                progression_sql::lock_active_character(&mut tx, user_id).await?
            {
                progression_sql::grant_exp_locked(&mut tx, &mut character, task.reward_exp as i64)
                    .await?;
                awarded_character_id = Some(character.id);
                xp_amount = task.reward_exp;
            }
        }

        append_event(
            &mut tx,
            &TaskEvent::logged(
                &task,
                user_id,
                awarded_character_id,
                amount,
                unit,
                xp_amount,
                now,
            ),
        )
        .await?;

        tx.commit().await.map_err(repo_err)?;
        Ok(task)
    }
}
