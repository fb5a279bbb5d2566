//! PostgreSQL implementation of CharacterKindRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskpet::{CharacterKind, CharacterKindRepository, DomainError, Stage};

pub struct PgCharacterKindRepository {
    pool: PgPool,
}

impl PgCharacterKindRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct KindRow {
    id: Uuid,
    name: String,
    asset_key: String,
    stage: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
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

#[async_trait]
impl CharacterKindRepository for PgCharacterKindRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CharacterKind>, DomainError> {
        let row = sqlx::query_as::<_, KindRow>("SELECT * FROM character_kinds WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_all(&self) -> Result<Vec<CharacterKind>, DomainError> {
        let rows = sqlx::query_as::<_, KindRow>(
            "SELECT * FROM character_kinds ORDER BY asset_key, stage",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_by_asset_key_and_stage(
        &self,
        asset_key: &str,
        stage: Stage,
    ) -> Result<Option<CharacterKind>, DomainError> {
        let row = sqlx::query_as::<_, KindRow>(
            "SELECT * FROM character_kinds WHERE asset_key = $1 AND stage = $2",
        )
        .bind(asset_key)
        .bind(stage.as_i16())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn insert_if_missing(&self, kind: &CharacterKind) -> Result<CharacterKind, DomainError> {
        let row = sqlx::query_as::<_, KindRow>(
            r#"
            INSERT INTO character_kinds (id, name, asset_key, stage)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (asset_key, stage) DO UPDATE SET name = character_kinds.name
            RETURNING *
            "#,
        )
        .bind(kind.id)
        .bind(&kind.name)
        .bind(&kind.asset_key)
        .bind(kind.stage.as_i16())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.try_into()
    }
}
