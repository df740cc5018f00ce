/// Dues payment model and database operations
///
/// A payment records that a player paid monthly or annual dues for a
/// period. `period` is the first day of the covered month; for annual
/// payments it is the month the covered year starts. Renewal status and
/// missed-month counting are recomputed from these rows on every report.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE payment_kind AS ENUM ('monthly', 'annual');
///
/// CREATE TABLE payments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     player_id UUID NOT NULL REFERENCES players(id) ON DELETE CASCADE,
///     kind payment_kind NOT NULL,
///     period DATE NOT NULL,
///     amount DOUBLE PRECISION NOT NULL,
///     paid_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     note TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Which dues cadence a payment covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// Covers one month of dues
    Monthly,

    /// Covers one year of dues
    Annual,
}

impl PaymentKind {
    /// Converts the kind to its database string
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Monthly => "monthly",
            PaymentKind::Annual => "annual",
        }
    }
}

/// Dues payment
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    /// Unique payment ID
    pub id: Uuid,

    /// Paying player
    pub player_id: Uuid,

    /// Covered cadence
    pub kind: PaymentKind,

    /// First day of the covered period
    pub period: NaiveDate,

    /// Amount paid, in currency units
    pub amount: f64,

    /// When the payment was received
    pub paid_at: DateTime<Utc>,

    /// Free-form note
    pub note: Option<String>,

    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// Input for recording a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayment {
    /// Paying player
    pub player_id: Uuid,

    /// Covered cadence
    pub kind: PaymentKind,

    /// First day of the covered period
    pub period: NaiveDate,

    /// Amount paid
    pub amount: f64,

    /// When the payment was received (defaults to now)
    pub paid_at: Option<DateTime<Utc>>,

    /// Free-form note
    pub note: Option<String>,
}

impl Payment {
    /// Records a new dues payment
    pub async fn create(pool: &PgPool, data: CreatePayment) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (player_id, kind, period, amount, paid_at, note)
            VALUES ($1, $2, $3, $4, COALESCE($5, NOW()), $6)
            RETURNING id, player_id, kind, period, amount, paid_at, note, created_at
            "#,
        )
        .bind(data.player_id)
        .bind(data.kind)
        .bind(data.period)
        .bind(data.amount)
        .bind(data.paid_at)
        .bind(data.note)
        .fetch_one(pool)
        .await
    }

    /// Finds a payment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, player_id, kind, period, amount, paid_at, note, created_at
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists payments, newest period first
    ///
    /// Optional filters: `player_id` and `kind`.
    pub async fn list(
        pool: &PgPool,
        player_id: Option<Uuid>,
        kind: Option<PaymentKind>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, player_id, kind, period, amount, paid_at, note, created_at
            FROM payments
            WHERE ($1::uuid IS NULL OR player_id = $1)
              AND ($2::payment_kind IS NULL OR kind = $2)
            ORDER BY period DESC, paid_at DESC
            "#,
        )
        .bind(player_id)
        .bind(kind)
        .fetch_all(pool)
        .await
    }

    /// Lists all payments for a set of players
    ///
    /// Backs the accounting summary, which derives renewal state from the
    /// full payment history in one pass.
    pub async fn list_by_players(
        pool: &PgPool,
        player_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, player_id, kind, period, amount, paid_at, note, created_at
            FROM payments
            WHERE player_id = ANY($1)
            ORDER BY period ASC
            "#,
        )
        .bind(player_ids)
        .fetch_all(pool)
        .await
    }

    /// Deletes a payment (mis-entry correction)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
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
    fn test_payment_kind_as_str() {
        assert_eq!(PaymentKind::Monthly.as_str(), "monthly");
        assert_eq!(PaymentKind::Annual.as_str(), "annual");
    }

    #[test]
    fn test_create_payment_deserialization() {
        let json = r#"{
            "player_id": "550e8400-e29b-41d4-a716-446655440000",
            "kind": "monthly",
            "period": "2025-03-01",
            "amount": 10.0
        }"#;
        let create: CreatePayment = serde_json::from_str(json).unwrap();
        assert_eq!(create.kind, PaymentKind::Monthly);
        assert_eq!(create.period, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert!(create.paid_at.is_none());
    }
}
