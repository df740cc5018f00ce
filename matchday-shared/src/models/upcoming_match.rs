/// Upcoming match model and database operations
///
/// A scheduled match carries an RSVP list; once played it is converted
/// into a `matches` row and keeps a pointer to it. Conversion is guarded
/// so a schedule entry can only be converted once.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE upcoming_matches (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     scheduled_at TIMESTAMPTZ NOT NULL,
///     location VARCHAR(255),
///     opponent VARCHAR(255),
///     note TEXT,
///     player_ids UUID[] NOT NULL DEFAULT '{}',
///     converted_match_id UUID REFERENCES matches(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const UPCOMING_COLUMNS: &str = "id, scheduled_at, location, opponent, note, player_ids, \
     converted_match_id, created_at, updated_at";

/// Scheduled match
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UpcomingMatch {
    /// Unique schedule-entry ID
    pub id: Uuid,

    /// Kick-off time
    pub scheduled_at: DateTime<Utc>,

    /// Venue
    pub location: Option<String>,

    /// Opposing team
    pub opponent: Option<String>,

    /// Free-form note
    pub note: Option<String>,

    /// Players who confirmed attendance
    pub player_ids: Vec<Uuid>,

    /// Match created from this entry, once converted
    pub converted_match_id: Option<Uuid>,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for scheduling a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUpcomingMatch {
    /// Kick-off time
    pub scheduled_at: DateTime<Utc>,

    /// Venue
    pub location: Option<String>,

    /// Opposing team
    pub opponent: Option<String>,

    /// Free-form note
    pub note: Option<String>,

    /// Initial RSVP list
    #[serde(default)]
    pub player_ids: Vec<Uuid>,
}

/// Input for updating a scheduled match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUpcomingMatch {
    /// New kick-off time
    pub scheduled_at: Option<DateTime<Utc>>,

    /// New venue
    pub location: Option<String>,

    /// New opponent
    pub opponent: Option<String>,

    /// New note
    pub note: Option<String>,

    /// Replacement RSVP list
    pub player_ids: Option<Vec<Uuid>>,
}

impl UpcomingMatch {
    /// Schedules a match
    pub async fn create(pool: &PgPool, data: CreateUpcomingMatch) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO upcoming_matches (scheduled_at, location, opponent, note, player_ids)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {UPCOMING_COLUMNS}"
        );

        sqlx::query_as::<_, UpcomingMatch>(&query)
            .bind(data.scheduled_at)
            .bind(data.location)
            .bind(data.opponent)
            .bind(data.note)
            .bind(data.player_ids)
            .fetch_one(pool)
            .await
    }

    /// Finds a schedule entry by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {UPCOMING_COLUMNS} FROM upcoming_matches WHERE id = $1");

        sqlx::query_as::<_, UpcomingMatch>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists schedule entries, soonest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {UPCOMING_COLUMNS} FROM upcoming_matches ORDER BY scheduled_at ASC"
        );

        sqlx::query_as::<_, UpcomingMatch>(&query)
            .fetch_all(pool)
            .await
    }

    /// Updates a schedule entry
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUpcomingMatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE upcoming_matches
             SET scheduled_at = COALESCE($2, scheduled_at),
                 location = COALESCE($3, location),
                 opponent = COALESCE($4, opponent),
                 note = COALESCE($5, note),
                 player_ids = COALESCE($6, player_ids),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {UPCOMING_COLUMNS}"
        );

        sqlx::query_as::<_, UpcomingMatch>(&query)
            .bind(id)
            .bind(data.scheduled_at)
            .bind(data.location)
            .bind(data.opponent)
            .bind(data.note)
            .bind(data.player_ids)
            .fetch_optional(pool)
            .await
    }

    /// Marks a schedule entry converted into a played match
    ///
    /// Guarded on `converted_match_id IS NULL`; returns None when the
    /// entry is missing or already converted.
    pub async fn mark_converted(
        pool: &PgPool,
        id: Uuid,
        match_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE upcoming_matches
             SET converted_match_id = $2,
                 updated_at = NOW()
             WHERE id = $1 AND converted_match_id IS NULL
             RETURNING {UPCOMING_COLUMNS}"
        );

        sqlx::query_as::<_, UpcomingMatch>(&query)
            .bind(id)
            .bind(match_id)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a schedule entry
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM upcoming_matches WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
