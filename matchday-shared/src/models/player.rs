/// Player model and database operations
///
/// Players are the roster entries of the club: regular members and guests.
/// Guests pay a surcharge on top of the member match fee and carry no dues
/// plan. `dues_reset_at` is an administrator-set timestamp; months before
/// it are excluded when counting missed monthly dues.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE players (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     nickname VARCHAR(100),
///     membership_id UUID REFERENCES memberships(id) ON DELETE RESTRICT,
///     is_guest BOOLEAN NOT NULL DEFAULT FALSE,
///     tags TEXT[] NOT NULL DEFAULT '{}',
///     active BOOLEAN NOT NULL DEFAULT TRUE,
///     dues_reset_at TIMESTAMPTZ,
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use matchday_shared::models::player::{CreatePlayer, Player};
/// use matchday_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let player = Player::create(&pool, CreatePlayer {
///     name: "Jonas Weber".to_string(),
///     nickname: Some("Jonny".to_string()),
///     membership_id: None,
///     is_guest: false,
///     tags: vec!["defense".to_string(), "founding".to_string()],
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Deserializes a field so that a missing key is `None` while an explicit
/// JSON null becomes `Some(None)`, letting updates clear nullable columns.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

const PLAYER_COLUMNS: &str = "id, name, nickname, membership_id, is_guest, tags, active, \
     dues_reset_at, joined_at, created_at, updated_at";

/// Player model representing a roster entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    /// Unique player ID
    pub id: Uuid,

    /// Full name
    pub name: String,

    /// Optional nickname shown on rosters
    pub nickname: Option<String>,

    /// Membership plan (None for guests and unaffiliated players)
    pub membership_id: Option<Uuid>,

    /// Whether this player is a guest (pays the guest match fee, no dues)
    pub is_guest: bool,

    /// Free-form tags (position, squad, ...)
    pub tags: Vec<String>,

    /// Inactive players are kept for history but skipped in reports
    pub active: bool,

    /// Months before this timestamp are excluded from missed-dues counting
    pub dues_reset_at: Option<DateTime<Utc>>,

    /// When the player joined the club
    pub joined_at: DateTime<Utc>,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlayer {
    /// Full name
    pub name: String,

    /// Optional nickname
    pub nickname: Option<String>,

    /// Membership plan to enroll in
    pub membership_id: Option<Uuid>,

    /// Guest flag
    #[serde(default)]
    pub is_guest: bool,

    /// Initial tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for updating a player
///
/// Only provided fields are changed. `membership_id` and `dues_reset_at`
/// use a double Option so that an explicit null clears the column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlayer {
    /// New name
    pub name: Option<String>,

    /// New nickname (explicit null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub nickname: Option<Option<String>>,

    /// New membership plan (explicit null removes the plan)
    #[serde(default, deserialize_with = "double_option")]
    pub membership_id: Option<Option<Uuid>>,

    /// New guest flag
    pub is_guest: Option<bool>,

    /// Replacement tag list
    pub tags: Option<Vec<String>>,

    /// New active flag
    pub active: Option<bool>,

    /// New dues reset timestamp (explicit null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub dues_reset_at: Option<Option<DateTime<Utc>>>,
}

impl Player {
    /// Creates a new player
    ///
    /// # Errors
    ///
    /// Returns an error if the referenced membership does not exist or the
    /// database operation fails.
    pub async fn create(pool: &PgPool, data: CreatePlayer) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO players (name, nickname, membership_id, is_guest, tags)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PLAYER_COLUMNS}"
        );

        sqlx::query_as::<_, Player>(&query)
            .bind(data.name)
            .bind(data.nickname)
            .bind(data.membership_id)
            .bind(data.is_guest)
            .bind(data.tags)
            .fetch_one(pool)
            .await
    }

    /// Finds a player by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1");

        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists players, newest joiners last
    ///
    /// Optional filters: `active`, `is_guest`, and a tag that must be
    /// present in the player's tag list.
    pub async fn list(
        pool: &PgPool,
        active: Option<bool>,
        is_guest: Option<bool>,
        tag: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {PLAYER_COLUMNS}
             FROM players
             WHERE ($1::boolean IS NULL OR active = $1)
               AND ($2::boolean IS NULL OR is_guest = $2)
               AND ($3::text IS NULL OR $3 = ANY(tags))
             ORDER BY joined_at ASC, name ASC"
        );

        sqlx::query_as::<_, Player>(&query)
            .bind(active)
            .bind(is_guest)
            .bind(tag)
            .fetch_all(pool)
            .await
    }

    /// Updates a player
    ///
    /// Returns the updated row, or None if the player does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdatePlayer,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE players
             SET name = COALESCE($2, name),
                 nickname = CASE WHEN $3 THEN $4 ELSE nickname END,
                 membership_id = CASE WHEN $5 THEN $6 ELSE membership_id END,
                 is_guest = COALESCE($7, is_guest),
                 tags = COALESCE($8, tags),
                 active = COALESCE($9, active),
                 dues_reset_at = CASE WHEN $10 THEN $11 ELSE dues_reset_at END,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {PLAYER_COLUMNS}"
        );

        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .bind(data.name)
            .bind(data.nickname.is_some())
            .bind(data.nickname.flatten())
            .bind(data.membership_id.is_some())
            .bind(data.membership_id.flatten())
            .bind(data.is_guest)
            .bind(data.tags)
            .bind(data.active)
            .bind(data.dues_reset_at.is_some())
            .bind(data.dues_reset_at.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Deletes a player
    ///
    /// Dues and match-fee records for the player cascade away with the row.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts players referencing a membership plan
    ///
    /// Backs the delete guard on memberships: a plan cannot be removed
    /// while players are enrolled in it.
    pub async fn count_by_membership(
        pool: &PgPool,
        membership_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM players WHERE membership_id = $1")
                .bind(membership_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Fetches the subset of `ids` that exist, preserving no particular order
    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ANY($1)");

        sqlx::query_as::<_, Player>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
