/// Referee session model and database operations
///
/// A referee session is the match-day officiating log: opened before
/// kick-off, appended to while play runs, and ended at the final whistle.
/// Events may only be appended while the session is open; the live SSE
/// tail in the API follows the event sequence until the session ends.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE ref_sessions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     match_id UUID REFERENCES matches(id) ON DELETE SET NULL,
///     label VARCHAR(255),
///     started_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     ended_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Referee session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefSession {
    /// Unique session ID
    pub id: Uuid,

    /// Match being officiated, if linked
    pub match_id: Option<Uuid>,

    /// Display label (e.g., "Sunday friendly vs. Rovers")
    pub label: Option<String>,

    /// When officiating started
    pub started_at: DateTime<Utc>,

    /// When officiating ended (None while the session is open)
    pub ended_at: Option<DateTime<Utc>>,

    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// Input for opening a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRefSession {
    /// Match being officiated
    pub match_id: Option<Uuid>,

    /// Display label
    pub label: Option<String>,
}

impl RefSession {
    /// Whether events may still be appended
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Opens a new session
    pub async fn create(pool: &PgPool, data: CreateRefSession) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, RefSession>(
            r#"
            INSERT INTO ref_sessions (match_id, label)
            VALUES ($1, $2)
            RETURNING id, match_id, label, started_at, ended_at, created_at
            "#,
        )
        .bind(data.match_id)
        .bind(data.label)
        .fetch_one(pool)
        .await
    }

    /// Finds a session by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, RefSession>(
            r#"
            SELECT id, match_id, label, started_at, ended_at, created_at
            FROM ref_sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists sessions, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, RefSession>(
            r#"
            SELECT id, match_id, label, started_at, ended_at, created_at
            FROM ref_sessions
            ORDER BY started_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Ends an open session
    ///
    /// Guarded on `ended_at IS NULL`; returns None when the session is
    /// missing or already ended.
    pub async fn end(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, RefSession>(
            r#"
            UPDATE ref_sessions
            SET ended_at = NOW()
            WHERE id = $1 AND ended_at IS NULL
            RETURNING id, match_id, label, started_at, ended_at, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
