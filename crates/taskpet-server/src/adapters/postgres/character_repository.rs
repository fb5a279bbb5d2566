//! PostgreSQL implementation of CharacterRepository
//!
//! Experience grants run inside one transaction with the character row
//! locked (`SELECT ... FOR UPDATE`) so concurrent task completions on
//! the same pet serialize instead of losing updates. Feeding locks the
//! owner row as well so the food debit and bond credit commit together.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskpet::{Character, CharacterRepository, DomainError, FeedConfig, FeedOutcome, LifeState, User};

use super::progression_sql::{self, CharacterRow};

pub struct PgCharacterRepository {
    pool: PgPool,
}

impl PgCharacterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    food_count: i32,
    active_character_id: Option<Uuid>,
    messaging_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            food_count: row.food_count,
            active_character_id: row.active_character_id,
            messaging_id: row.messaging_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn repo_err(e: sqlx::Error) -> DomainError {
    DomainError::Repository(e.to_string())
}

impl PgCharacterRepository {
    async fn load_owner(&self, user_id: Uuid) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(repo_err)?;
        Ok(row.into())
    }
}

#[async_trait]
impl CharacterRepository for PgCharacterRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Character>, DomainError> {
        let row = sqlx::query_as::<_, CharacterRow>("SELECT * FROM characters WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(repo_err)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_active_for_user(&self, user_id: Uuid) -> Result<Option<Character>, DomainError> {
        let row = sqlx::query_as::<_, CharacterRow>(
            r#"
            SELECT c.* FROM characters c
            JOIN users u ON u.active_character_id = c.id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(repo_err)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn insert(&self, character: &Character) -> Result<Character, DomainError> {
        let row = sqlx::query_as::<_, CharacterRow>(
            r#"
            INSERT INTO characters
                (id, user_id, kind_id, level, exp, bond, bond_max, stage, life_state,
                 last_activity_at, dead_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(character.id)
        .bind(character.user_id)
        .bind(character.kind_id)
        .bind(character.level)
        .bind(character.exp)
        .bind(character.bond)
        .bind(character.bond_max)
        .bind(character.stage.as_i16())
        .bind(character.life_state.as_i16())
        .bind(character.last_activity_at)
        .bind(character.dead_at)
        .fetch_one(&self.pool)
        .await
        .map_err(repo_err)?;

        row.try_into()
    }

    async fn save(&self, character: &Character) -> Result<Character, DomainError> {
        let row = sqlx::query_as::<_, CharacterRow>(
            r#"
            UPDATE characters
            SET kind_id = $2, level = $3, exp = $4, bond = $5, bond_max = $6,
                stage = $7, life_state = $8, last_activity_at = $9, dead_at = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(character.id)
        .bind(character.kind_id)
        .bind(character.level)
        .bind(character.exp)
        .bind(character.bond)
        .bind(character.bond_max)
        .bind(character.stage.as_i16())
        .bind(character.life_state.as_i16())
        .bind(character.last_activity_at)
        .bind(character.dead_at)
        .fetch_one(&self.pool)
        .await
        .map_err(repo_err)?;

        row.try_into()
    }

    async fn feed_active(
        &self,
        user_id: Uuid,
        config: &FeedConfig,
    ) -> Result<Option<FeedOutcome>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(repo_err)?;

        let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        let Some(character_id) = user.active_character_id else {
            return Ok(None);
        };

        let mut character = progression_sql::lock_character(&mut tx, character_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Character", character_id))?;

        let outcome = character.try_feed(user.food_count, config, Utc::now());

        if let FeedOutcome::Fed { food_cost } = outcome {
            sqlx::query(
                "UPDATE users SET food_count = food_count - $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(user_id)
            .bind(food_cost)
            .execute(&mut *tx)
            .await
            .map_err(repo_err)?;

            sqlx::query(
                "UPDATE characters SET bond = $2, last_activity_at = $3, updated_at = NOW() WHERE id = $1",
            )
            .bind(character.id)
            .bind(character.bond)
            .bind(character.last_activity_at)
            .execute(&mut *tx)
            .await
            .map_err(repo_err)?;

            tx.commit().await.map_err(repo_err)?;
        }

        Ok(Some(outcome))
    }

    async fn find_active_alive(&self) -> Result<Vec<Character>, DomainError> {
        let rows = sqlx::query_as::<_, CharacterRow>(
            r#"
            SELECT c.* FROM characters c
            JOIN users u ON u.active_character_id = c.id
            WHERE c.life_state = $1
            "#,
        )
        .bind(LifeState::Alive.as_i16())
        .fetch_all(&self.pool)
        .await
        .map_err(repo_err)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_active_with_bond(
        &self,
        bond: i32,
    ) -> Result<Vec<(User, Character)>, DomainError> {
        let rows = sqlx::query_as::<_, CharacterRow>(
            r#"
            SELECT c.* FROM characters c
            JOIN users u ON u.active_character_id = c.id
            WHERE c.bond = $1 AND c.life_state = $2
            "#,
        )
        .bind(bond)
        .bind(LifeState::Alive.as_i16())
        .fetch_all(&self.pool)
        .await
        .map_err(repo_err)?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let character: Character = row.try_into()?;
            let user = self.load_owner(character.user_id).await?;
            results.push((user, character));
        }

        Ok(results)
    }

    async fn find_dead_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(User, Character)>, DomainError> {
        let rows = sqlx::query_as::<_, CharacterRow>(
            r#"
            SELECT c.* FROM characters c
            JOIN users u ON u.active_character_id = c.id
            WHERE c.life_state = $1 AND c.dead_at >= $2 AND c.dead_at <= $3
            "#,
        )
        .bind(LifeState::Dead.as_i16())
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(repo_err)?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let character: Character = row.try_into()?;
            let user = self.load_owner(character.user_id).await?;
            results.push((user, character));
        }

        Ok(results)
    }
}
