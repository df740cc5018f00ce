/// Club-wide accounting settings
///
/// A single row (id = 1) holding the default dues amounts, the guest
/// surcharge applied on top of the member match fee, and the window in
/// which a renewal counts as "due soon". Seeded by the initial migration;
/// updates patch the row in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Club accounting settings (single row)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DuesSettings {
    /// Always 1
    pub id: i16,

    /// Default monthly dues amount
    pub monthly_amount: f64,

    /// Default annual dues amount
    pub annual_amount: f64,

    /// Surcharge guests pay on top of the member match fee
    pub guest_surcharge: f64,

    /// Days before expiry at which a renewal counts as due soon
    pub due_soon_days: i32,

    /// When the settings were last changed
    pub updated_at: DateTime<Utc>,
}

/// Input for updating the settings row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDuesSettings {
    /// New monthly dues amount
    pub monthly_amount: Option<f64>,

    /// New annual dues amount
    pub annual_amount: Option<f64>,

    /// New guest surcharge
    pub guest_surcharge: Option<f64>,

    /// New due-soon window in days
    pub due_soon_days: Option<i32>,
}

impl DuesSettings {
    /// Fetches the settings row
    ///
    /// The row is seeded by the initial migration, so this does not return
    /// an Option.
    pub async fn get(pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, DuesSettings>(
            r#"
            SELECT id, monthly_amount, annual_amount, guest_surcharge, due_soon_days, updated_at
            FROM dues_settings
            WHERE id = 1
            "#,
        )
        .fetch_one(pool)
        .await
    }

    /// Patches the settings row, returning the updated state
    pub async fn update(pool: &PgPool, data: UpdateDuesSettings) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, DuesSettings>(
            r#"
            UPDATE dues_settings
            SET monthly_amount = COALESCE($1, monthly_amount),
                annual_amount = COALESCE($2, annual_amount),
                guest_surcharge = COALESCE($3, guest_surcharge),
                due_soon_days = COALESCE($4, due_soon_days),
                updated_at = NOW()
            WHERE id = 1
            RETURNING id, monthly_amount, annual_amount, guest_surcharge, due_soon_days, updated_at
            "#,
        )
        .bind(data.monthly_amount)
        .bind(data.annual_amount)
        .bind(data.guest_surcharge)
        .bind(data.due_soon_days)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_dues_settings_partial() {
        let update: UpdateDuesSettings =
            serde_json::from_str(r#"{"guest_surcharge": 2.5}"#).unwrap();
        assert_eq!(update.guest_surcharge, Some(2.5));
        assert!(update.monthly_amount.is_none());
        assert!(update.due_soon_days.is_none());
    }
}
