//! Shared transactional helpers for character progression
//!
//! Both the character repository and the task ledger mutate experience;
//! the row locking, level cascade and hatch/evolve kind reassignment
//! live here so every write path behaves identically.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use taskpet::{Character, CharacterKind, DomainError, LifeState, Stage};

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
pub(crate) struct CharacterRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind_id: Uuid,
    pub level: i32,
    pub exp: i64,
    pub bond: i32,
    pub bond_max: i32,
    pub stage: i16,
    pub life_state: i16,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub dead_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CharacterRow> for Character {
    type Error = DomainError;

    fn try_from(row: CharacterRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            kind_id: row.kind_id,
            level: row.level,
            exp: row.exp,
            bond: row.bond,
            bond_max: row.bond_max,
            stage: Stage::try_from(row.stage).map_err(DomainError::Repository)?,
            life_state: LifeState::try_from(row.life_state).map_err(DomainError::Repository)?,
            last_activity_at: row.last_activity_at,
            dead_at: row.dead_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct KindRow {
    pub id: Uuid,
    pub name: String,
    pub asset_key: String,
    pub stage: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<KindRow> for CharacterKind {
    type Error = DomainError;

    fn try_from(row: KindRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            asset_key: row.asset_key,
            stage: Stage::try_from(row.stage).map_err(DomainError::Repository)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn repo_err(e: sqlx::Error) -> DomainError {
    DomainError::Repository(e.to_string())
}

/// Lock a character row for the rest of the transaction.
pub(crate) async fn lock_character(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Character>, DomainError> {
    let row = sqlx::query_as::<_, CharacterRow>("SELECT * FROM characters WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(repo_err)?;

    row.map(TryInto::try_into).transpose()
}

/// Lock the user's active character, if any.
pub(crate) async fn lock_active_character(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<Option<Character>, DomainError> {
    let row = sqlx::query_as::<_, CharacterRow>(
        r#"
        SELECT c.* FROM characters c
        JOIN users u ON u.active_character_id = c.id
        WHERE u.id = $1
        FOR UPDATE OF c
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(repo_err)?;

    row.map(TryInto::try_into).transpose()
}

/// Apply an experience gain to an already-locked character: cascade
/// level-ups, resolve any owed hatch/evolution, and persist. The hatch
/// target is a uniform random pick among child-stage kinds.
pub(crate) async fn grant_exp_locked(
    tx: &mut Transaction<'_, Postgres>,
    character: &mut Character,
    amount: i64,
) -> Result<(), DomainError> {
    let needs = character.apply_exp_gain(amount, Utc::now());
    if amount <= 0 {
        return Ok(());
    }

    if needs.hatch_due {
        let picked = sqlx::query_as::<_, KindRow>(
            "SELECT * FROM character_kinds WHERE stage = $1 ORDER BY random() LIMIT 1",
        )
        .bind(Stage::Child.as_i16())
        .fetch_optional(&mut **tx)
        .await
        .map_err(repo_err)?;

        match picked {
            Some(row) => {
                let kind: CharacterKind = row.try_into()?;
                tracing::info!("Character {} hatched into {}", character.id, kind.name);
                character.hatch_into(&kind);
            }
            None => tracing::warn!("No child-stage kinds seeded; hatch skipped"),
        }
    }

    if needs.evolve_due && character.stage == Stage::Child {
        let current = sqlx::query_as::<_, KindRow>("SELECT * FROM character_kinds WHERE id = $1")
            .bind(character.kind_id)
            .fetch_one(&mut **tx)
            .await
            .map_err(repo_err)?;

        let adult = sqlx::query_as::<_, KindRow>(
            "SELECT * FROM character_kinds WHERE asset_key = $1 AND stage = $2",
        )
        .bind(&current.asset_key)
        .bind(Stage::Adult.as_i16())
        .fetch_optional(&mut **tx)
        .await
        .map_err(repo_err)?;

        match adult {
            Some(row) => {
                let kind: CharacterKind = row.try_into()?;
                tracing::info!("Character {} evolved into {}", character.id, kind.name);
                character.evolve_into(&kind);
            }
            None => tracing::warn!(
                "No adult kind for asset_key {}; evolution skipped",
                current.asset_key
            ),
        }
    }

    persist_progression(tx, character).await
}

/// Reverse experience on an already-locked character. Level and stage
/// are left alone on purpose.
pub(crate) async fn revoke_exp_locked(
    tx: &mut Transaction<'_, Postgres>,
    character: &mut Character,
    amount: i64,
) -> Result<(), DomainError> {
    character.decrease_exp(amount);
    sqlx::query("UPDATE characters SET exp = $2, updated_at = NOW() WHERE id = $1")
        .bind(character.id)
        .bind(character.exp)
        .execute(&mut **tx)
        .await
        .map_err(repo_err)?;

    Ok(())
}

async fn persist_progression(
    tx: &mut Transaction<'_, Postgres>,
    character: &Character,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        UPDATE characters
        SET level = $2, exp = $3, kind_id = $4, stage = $5,
            last_activity_at = $6, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(character.id)
    .bind(character.level)
    .bind(character.exp)
    .bind(character.kind_id)
    .bind(character.stage.as_i16())
    .bind(character.last_activity_at)
    .execute(&mut **tx)
    .await
    .map_err(repo_err)?;

    Ok(())
}
