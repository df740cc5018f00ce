/// Tag preset model
///
/// A named list of tags that the roster UI applies in one click
/// (e.g., "first team", "veterans"). Plain CRUD, no invariants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Named tag list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagPreset {
    /// Unique preset ID
    pub id: Uuid,

    /// Preset name (unique)
    pub name: String,

    /// Tags the preset applies
    pub tags: Vec<String>,

    /// When the preset was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a tag preset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTagPreset {
    /// Preset name
    pub name: String,

    /// Tags the preset applies
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for updating a tag preset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTagPreset {
    /// New name
    pub name: Option<String>,

    /// Replacement tag list
    pub tags: Option<Vec<String>>,
}

impl TagPreset {
    /// Creates a preset
    pub async fn create(pool: &PgPool, data: CreateTagPreset) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, TagPreset>(
            r#"
            INSERT INTO tag_presets (name, tags)
            VALUES ($1, $2)
            RETURNING id, name, tags, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.tags)
        .fetch_one(pool)
        .await
    }

    /// Finds a preset by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TagPreset>(
            "SELECT id, name, tags, created_at FROM tag_presets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists all presets by name
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TagPreset>(
            "SELECT id, name, tags, created_at FROM tag_presets ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Updates a preset
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTagPreset,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TagPreset>(
            r#"
            UPDATE tag_presets
            SET name = COALESCE($2, name),
                tags = COALESCE($3, tags)
            WHERE id = $1
            RETURNING id, name, tags, created_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.tags)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a preset
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tag_presets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
