/// Match model and database operations
///
/// A match records when and where the team played, who attended
/// (`player_ids`, split into members and guests via the roster), the
/// venue cost, and optional stored fees. Voiding a match keeps the row
/// but excludes it from all financial aggregation until it is restored.
///
/// # Bookkeeping
///
/// ```text
/// active ──void──▶ voided
/// voided ──restore──▶ active
/// ```
///
/// Both transitions are guarded updates: voiding an already-voided match
/// (or restoring an active one) affects no rows and surfaces as a
/// conflict in the API layer.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE matches (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     played_at TIMESTAMPTZ NOT NULL,
///     location VARCHAR(255),
///     opponent VARCHAR(255),
///     total_cost DOUBLE PRECISION,
///     member_fee DOUBLE PRECISION,
///     guest_surcharge DOUBLE PRECISION,
///     player_ids UUID[] NOT NULL DEFAULT '{}',
///     is_voided BOOLEAN NOT NULL DEFAULT FALSE,
///     voided_at TIMESTAMPTZ,
///     note TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const MATCH_COLUMNS: &str = "id, played_at, location, opponent, total_cost, member_fee, \
     guest_surcharge, player_ids, is_voided, voided_at, note, created_at, updated_at";

/// Match model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    /// Unique match ID
    pub id: Uuid,

    /// When the match was played
    pub played_at: DateTime<Utc>,

    /// Venue
    pub location: Option<String>,

    /// Opposing team
    pub opponent: Option<String>,

    /// Total venue cost, if known
    pub total_cost: Option<f64>,

    /// Stored per-member fee (overrides recomputation from total_cost)
    pub member_fee: Option<f64>,

    /// Stored guest surcharge (overrides the club default)
    pub guest_surcharge: Option<f64>,

    /// Attending players; member/guest split comes from the roster
    pub player_ids: Vec<Uuid>,

    /// Voided matches are excluded from financial aggregation
    pub is_voided: bool,

    /// When the match was voided
    pub voided_at: Option<DateTime<Utc>>,

    /// Free-form note
    pub note: Option<String>,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatch {
    /// When the match was played
    pub played_at: DateTime<Utc>,

    /// Venue
    pub location: Option<String>,

    /// Opposing team
    pub opponent: Option<String>,

    /// Total venue cost
    pub total_cost: Option<f64>,

    /// Explicit per-member fee
    pub member_fee: Option<f64>,

    /// Explicit guest surcharge
    pub guest_surcharge: Option<f64>,

    /// Attending players
    #[serde(default)]
    pub player_ids: Vec<Uuid>,

    /// Free-form note
    pub note: Option<String>,
}

/// Input for updating a match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMatch {
    /// New play time
    pub played_at: Option<DateTime<Utc>>,

    /// New venue
    pub location: Option<String>,

    /// New opponent
    pub opponent: Option<String>,

    /// New total venue cost
    pub total_cost: Option<f64>,

    /// New stored per-member fee
    pub member_fee: Option<f64>,

    /// New stored guest surcharge
    pub guest_surcharge: Option<f64>,

    /// Replacement attendance list
    pub player_ids: Option<Vec<Uuid>>,

    /// New note
    pub note: Option<String>,
}

impl Match {
    /// Creates a new match
    pub async fn create(pool: &PgPool, data: CreateMatch) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO matches (played_at, location, opponent, total_cost, member_fee,
                                  guest_surcharge, player_ids, note)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {MATCH_COLUMNS}"
        );

        sqlx::query_as::<_, Match>(&query)
            .bind(data.played_at)
            .bind(data.location)
            .bind(data.opponent)
            .bind(data.total_cost)
            .bind(data.member_fee)
            .bind(data.guest_surcharge)
            .bind(data.player_ids)
            .bind(data.note)
            .fetch_one(pool)
            .await
    }

    /// Finds a match by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1");

        sqlx::query_as::<_, Match>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists matches, most recent first
    ///
    /// Voided matches are included only when `include_voided` is set; the
    /// accounting endpoints always leave it unset.
    pub async fn list(pool: &PgPool, include_voided: bool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {MATCH_COLUMNS}
             FROM matches
             WHERE $1 OR NOT is_voided
             ORDER BY played_at DESC"
        );

        sqlx::query_as::<_, Match>(&query)
            .bind(include_voided)
            .fetch_all(pool)
            .await
    }

    /// Updates a match
    ///
    /// Returns the updated row, or None if the match does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateMatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE matches
             SET played_at = COALESCE($2, played_at),
                 location = COALESCE($3, location),
                 opponent = COALESCE($4, opponent),
                 total_cost = COALESCE($5, total_cost),
                 member_fee = COALESCE($6, member_fee),
                 guest_surcharge = COALESCE($7, guest_surcharge),
                 player_ids = COALESCE($8, player_ids),
                 note = COALESCE($9, note),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {MATCH_COLUMNS}"
        );

        sqlx::query_as::<_, Match>(&query)
            .bind(id)
            .bind(data.played_at)
            .bind(data.location)
            .bind(data.opponent)
            .bind(data.total_cost)
            .bind(data.member_fee)
            .bind(data.guest_surcharge)
            .bind(data.player_ids)
            .bind(data.note)
            .fetch_optional(pool)
            .await
    }

    /// Voids a match, excluding it from financial aggregation
    ///
    /// Guarded on `is_voided = FALSE`; returns None when the match is
    /// missing or already voided.
    pub async fn void(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE matches
             SET is_voided = TRUE,
                 voided_at = NOW(),
                 updated_at = NOW()
             WHERE id = $1 AND is_voided = FALSE
             RETURNING {MATCH_COLUMNS}"
        );

        sqlx::query_as::<_, Match>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Restores a voided match into financial aggregation
    ///
    /// Guarded on `is_voided = TRUE`; returns None when the match is
    /// missing or not voided.
    pub async fn restore(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE matches
             SET is_voided = FALSE,
                 voided_at = NULL,
                 updated_at = NOW()
             WHERE id = $1 AND is_voided = TRUE
             RETURNING {MATCH_COLUMNS}"
        );

        sqlx::query_as::<_, Match>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a match
    ///
    /// Match-fee records for the match cascade away with the row.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_match_defaults() {
        let json = r#"{"played_at": "2025-03-08T14:00:00Z"}"#;
        let create: CreateMatch = serde_json::from_str(json).unwrap();
        assert!(create.player_ids.is_empty());
        assert!(create.total_cost.is_none());
        assert!(create.member_fee.is_none());
    }

    #[test]
    fn test_match_serialization_roundtrip() {
        let json = r#"{
            "played_at": "2025-03-08T14:00:00Z",
            "location": "Stadtpark",
            "total_cost": 85.0,
            "player_ids": ["550e8400-e29b-41d4-a716-446655440000"]
        }"#;
        let create: CreateMatch = serde_json::from_str(json).unwrap();
        assert_eq!(create.location.as_deref(), Some("Stadtpark"));
        assert_eq!(create.total_cost, Some(85.0));
        assert_eq!(create.player_ids.len(), 1);
    }
}
