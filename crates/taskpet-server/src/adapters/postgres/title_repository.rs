//! PostgreSQL implementation of TitleRepository
//!
//! The unique index on (user_id, title_id) is the authoritative guard
//! against concurrent double-grants; `try_unlock` converts the conflict
//! into a quiet `false`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskpet::{DomainError, Title, TitleRepository, TitleRule, UserTitle};

pub struct PgTitleRepository {
    pool: PgPool,
}

impl PgTitleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct TitleRow {
    id: Uuid,
    key: String,
    name: String,
    description: Option<String>,
    rule_type: String,
    threshold: i64,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TitleRow> for Title {
    type Error = DomainError;

    fn try_from(row: TitleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            key: row.key,
            name: row.name,
            description: row.description,
            rule: row.rule_type.parse::<TitleRule>().map_err(DomainError::Repository)?,
            threshold: row.threshold,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl TitleRepository for PgTitleRepository {
    async fn find_active(&self) -> Result<Vec<Title>, DomainError> {
        let rows = sqlx::query_as::<_, TitleRow>(
            "SELECT * FROM titles WHERE active = TRUE ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn unlocked_title_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT title_id FROM user_titles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(ids)
    }

    async fn try_unlock(&self, unlock: &UserTitle) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_titles (id, user_id, title_id, unlocked_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, title_id) DO NOTHING
            "#,
        )
        .bind(unlock.id)
        .bind(unlock.user_id)
        .bind(unlock.title_id)
        .bind(unlock.unlocked_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_if_missing(&self, title: &Title) -> Result<Title, DomainError> {
        let row = sqlx::query_as::<_, TitleRow>(
            r#"
            INSERT INTO titles (id, key, name, description, rule_type, threshold, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (key) DO UPDATE SET key = titles.key
            RETURNING *
            "#,
        )
        .bind(title.id)
        .bind(&title.key)
        .bind(&title.name)
        .bind(&title.description)
        .bind(title.rule.to_string())
        .bind(title.threshold)
        .bind(title.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.try_into()
    }
}
