/// Match-fee payment model and database operations
///
/// One row per attendee per match, created when fees are collected for a
/// match. Rows start `pending` and are individually marked paid or
/// waived; bulk confirmation applies per row with no transaction, so a
/// partial failure leaves a mixed state that the API reports as-is.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE match_payment_status AS ENUM ('pending', 'paid', 'waived');
///
/// CREATE TABLE match_payments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     match_id UUID NOT NULL REFERENCES matches(id) ON DELETE CASCADE,
///     player_id UUID NOT NULL REFERENCES players(id) ON DELETE CASCADE,
///     amount DOUBLE PRECISION NOT NULL,
///     status match_payment_status NOT NULL DEFAULT 'pending',
///     paid_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (match_id, player_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Collection status of a match-fee record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Fee owed, not yet collected
    Pending,

    /// Fee collected
    Paid,

    /// Fee forgiven (injury, birthday, ...)
    Waived,
}

impl PaymentStatus {
    /// Converts the status to its database string
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Waived => "waived",
        }
    }

    /// Whether the fee still counts as outstanding
    pub fn is_outstanding(&self) -> bool {
        matches!(self, PaymentStatus::Pending)
    }
}

/// Match-fee payment record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchPayment {
    /// Unique record ID
    pub id: Uuid,

    /// Match the fee belongs to
    pub match_id: Uuid,

    /// Player owing the fee
    pub player_id: Uuid,

    /// Fee amount, in currency units
    pub amount: f64,

    /// Collection status
    pub status: PaymentStatus,

    /// When the fee was collected
    pub paid_at: Option<DateTime<Utc>>,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

impl MatchPayment {
    /// Creates a fee record for one attendee
    ///
    /// # Errors
    ///
    /// Returns a conflict (unique constraint) when the player already has
    /// a record for this match.
    pub async fn create(
        pool: &PgPool,
        match_id: Uuid,
        player_id: Uuid,
        amount: f64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, MatchPayment>(
            r#"
            INSERT INTO match_payments (match_id, player_id, amount)
            VALUES ($1, $2, $3)
            RETURNING id, match_id, player_id, amount, status, paid_at, created_at, updated_at
            "#,
        )
        .bind(match_id)
        .bind(player_id)
        .bind(amount)
        .fetch_one(pool)
        .await
    }

    /// Finds a record by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, MatchPayment>(
            r#"
            SELECT id, match_id, player_id, amount, status, paid_at, created_at, updated_at
            FROM match_payments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists records, newest first
    ///
    /// Optional filters: `match_id`, `player_id`, `status`.
    pub async fn list(
        pool: &PgPool,
        match_id: Option<Uuid>,
        player_id: Option<Uuid>,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, MatchPayment>(
            r#"
            SELECT id, match_id, player_id, amount, status, paid_at, created_at, updated_at
            FROM match_payments
            WHERE ($1::uuid IS NULL OR match_id = $1)
              AND ($2::uuid IS NULL OR player_id = $2)
              AND ($3::match_payment_status IS NULL OR status = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(match_id)
        .bind(player_id)
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// Updates a record's status and optionally its amount
    ///
    /// Marking a record paid stamps `paid_at`; moving it back to pending
    /// clears the stamp.
    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: PaymentStatus,
        amount: Option<f64>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, MatchPayment>(
            r#"
            UPDATE match_payments
            SET status = $2,
                amount = COALESCE($3, amount),
                paid_at = CASE WHEN $2 = 'paid'::match_payment_status THEN NOW() ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, match_id, player_id, amount, status, paid_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(amount)
        .fetch_optional(pool)
        .await
    }

    /// Marks a pending record paid
    ///
    /// Guarded on `status = 'pending'` so confirming twice (or confirming
    /// a waived record) reports a conflict instead of silently restamping.
    pub async fn confirm(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, MatchPayment>(
            r#"
            UPDATE match_payments
            SET status = 'paid',
                paid_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, match_id, player_id, amount, status, paid_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Sums outstanding fees per player, excluding voided matches
    ///
    /// Returns (player_id, outstanding_total) pairs for the accounting
    /// summary.
    pub async fn outstanding_by_player(pool: &PgPool) -> Result<Vec<(Uuid, f64)>, sqlx::Error> {
        sqlx::query_as::<_, (Uuid, f64)>(
            r#"
            SELECT mp.player_id, COALESCE(SUM(mp.amount), 0)
            FROM match_payments mp
            JOIN matches m ON m.id = mp.match_id
            WHERE mp.status = 'pending' AND m.is_voided = FALSE
            GROUP BY mp.player_id
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
