/// Membership plan model and database operations
///
/// A membership plan names a dues cadence (monthly, annual, or none) and
/// the fee charged per period. Players reference a plan through
/// `players.membership_id`; the plan drives renewal-status derivation.
///
/// A plan cannot be deleted while players reference it. The schema uses
/// `ON DELETE RESTRICT` and the API layer additionally checks
/// `Player::count_by_membership` so the client gets a clean conflict
/// instead of a constraint error.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE billing_period AS ENUM ('monthly', 'annual', 'none');
///
/// CREATE TABLE memberships (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL UNIQUE,
///     billing billing_period NOT NULL DEFAULT 'monthly',
///     fee DOUBLE PRECISION NOT NULL DEFAULT 0,
///     active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Dues billing cadence of a membership plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "billing_period", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    /// Dues are owed every month
    Monthly,

    /// Dues are owed once a year
    Annual,

    /// No recurring dues (e.g., honorary members)
    None,
}

impl BillingPeriod {
    /// Converts the cadence to its database string
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Annual => "annual",
            BillingPeriod::None => "none",
        }
    }

    /// Whether this cadence accrues recurring dues at all
    pub fn is_recurring(&self) -> bool {
        !matches!(self, BillingPeriod::None)
    }
}

/// Membership plan
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Unique plan ID
    pub id: Uuid,

    /// Plan name (unique)
    pub name: String,

    /// Dues cadence
    pub billing: BillingPeriod,

    /// Fee per billing period, in currency units
    pub fee: f64,

    /// Inactive plans cannot be assigned to new players
    pub active: bool,

    /// When the plan was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a membership plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    /// Plan name
    pub name: String,

    /// Dues cadence (defaults to monthly)
    #[serde(default = "default_billing")]
    pub billing: BillingPeriod,

    /// Fee per billing period
    #[serde(default)]
    pub fee: f64,
}

fn default_billing() -> BillingPeriod {
    BillingPeriod::Monthly
}

/// Input for updating a membership plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMembership {
    /// New plan name
    pub name: Option<String>,

    /// New cadence
    pub billing: Option<BillingPeriod>,

    /// New fee
    pub fee: Option<f64>,

    /// New active flag
    pub active: Option<bool>,
}

impl Membership {
    /// Creates a new membership plan
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate name (unique constraint) or if the
    /// database operation fails.
    pub async fn create(pool: &PgPool, data: CreateMembership) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (name, billing, fee)
            VALUES ($1, $2, $3)
            RETURNING id, name, billing, fee, active, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.billing)
        .bind(data.fee)
        .fetch_one(pool)
        .await
    }

    /// Finds a plan by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, name, billing, fee, active, created_at
            FROM memberships
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists all plans, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, name, billing, fee, active, created_at
            FROM memberships
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Updates a plan
    ///
    /// Returns the updated row, or None if the plan does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateMembership,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships
            SET name = COALESCE($2, name),
                billing = COALESCE($3, billing),
                fee = COALESCE($4, fee),
                active = COALESCE($5, active)
            WHERE id = $1
            RETURNING id, name, billing, fee, active, created_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.billing)
        .bind(data.fee)
        .bind(data.active)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a plan
    ///
    /// Callers must check `Player::count_by_membership` first; the foreign
    /// key restricts deletion while players reference the plan.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM memberships WHERE id = $1")
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
    fn test_billing_period_as_str() {
        assert_eq!(BillingPeriod::Monthly.as_str(), "monthly");
        assert_eq!(BillingPeriod::Annual.as_str(), "annual");
        assert_eq!(BillingPeriod::None.as_str(), "none");
    }

    #[test]
    fn test_billing_period_recurring() {
        assert!(BillingPeriod::Monthly.is_recurring());
        assert!(BillingPeriod::Annual.is_recurring());
        assert!(!BillingPeriod::None.is_recurring());
    }

    #[test]
    fn test_create_membership_defaults() {
        let create: CreateMembership = serde_json::from_str(r#"{"name": "Regular"}"#).unwrap();
        assert_eq!(create.billing, BillingPeriod::Monthly);
        assert_eq!(create.fee, 0.0);
    }
}
