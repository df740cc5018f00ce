/// Referee event model and database operations
///
/// Append-only log entries within a referee session. `seq` is assigned
/// per session on insert and is the cursor for the live SSE tail: a
/// client resumes by asking for events after the last seq it saw.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE ref_event_kind AS ENUM (
///     'kickoff', 'goal', 'card', 'substitution', 'period_end', 'note'
/// );
/// CREATE TYPE ref_team AS ENUM ('home', 'away');
///
/// CREATE TABLE ref_events (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     session_id UUID NOT NULL REFERENCES ref_sessions(id) ON DELETE CASCADE,
///     seq BIGINT NOT NULL,
///     kind ref_event_kind NOT NULL,
///     team ref_team,
///     detail TEXT,
///     recorded_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (session_id, seq)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// What happened on the pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ref_event_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RefEventKind {
    /// Start of play
    Kickoff,

    /// Goal scored
    Goal,

    /// Yellow/red card shown
    Card,

    /// Player substitution
    Substitution,

    /// End of a half or period
    PeriodEnd,

    /// Free-form referee note
    Note,
}

/// Which side an event concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ref_team", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RefTeam {
    /// Our team
    Home,

    /// The opponent
    Away,
}

/// Referee event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefEvent {
    /// Unique event ID
    pub id: Uuid,

    /// Session the event belongs to
    pub session_id: Uuid,

    /// Monotonic sequence number within the session (starts at 1)
    pub seq: i64,

    /// Event kind
    pub kind: RefEventKind,

    /// Side the event concerns, if any
    pub team: Option<RefTeam>,

    /// Free-form detail ("7 — header from the corner")
    pub detail: Option<String>,

    /// When the event was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Input for appending an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRefEvent {
    /// Event kind
    pub kind: RefEventKind,

    /// Side the event concerns
    pub team: Option<RefTeam>,

    /// Free-form detail
    pub detail: Option<String>,
}

impl RefEvent {
    /// Appends an event to a session, assigning the next seq
    ///
    /// The seq subquery and the unique `(session_id, seq)` constraint keep
    /// the log strictly ordered even with concurrent appends.
    pub async fn append(
        pool: &PgPool,
        session_id: Uuid,
        data: CreateRefEvent,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, RefEvent>(
            r#"
            INSERT INTO ref_events (session_id, seq, kind, team, detail)
            VALUES (
                $1,
                (SELECT COALESCE(MAX(seq), 0) + 1 FROM ref_events WHERE session_id = $1),
                $2, $3, $4
            )
            RETURNING id, session_id, seq, kind, team, detail, recorded_at
            "#,
        )
        .bind(session_id)
        .bind(data.kind)
        .bind(data.team)
        .bind(data.detail)
        .fetch_one(pool)
        .await
    }

    /// Lists a session's events in sequence order
    pub async fn list_by_session(
        pool: &PgPool,
        session_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, RefEvent>(
            r#"
            SELECT id, session_id, seq, kind, team, detail, recorded_at
            FROM ref_events
            WHERE session_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }

    /// Lists events after a cursor, in sequence order
    ///
    /// Backs both SSE backfill and the live tail's polling loop.
    pub async fn list_after(
        pool: &PgPool,
        session_id: Uuid,
        after_seq: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, RefEvent>(
            r#"
            SELECT id, session_id, seq, kind, team, detail, recorded_at
            FROM ref_events
            WHERE session_id = $1 AND seq > $2
            ORDER BY seq ASC
            "#,
        )
        .bind(session_id)
        .bind(after_seq)
        .fetch_all(pool)
        .await
    }
}
