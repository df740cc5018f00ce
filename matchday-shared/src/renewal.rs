/// Dues renewal status and missed-month derivation
///
/// A reporting view, not a stateful engine: the accounting summary
/// recomputes everything here from the full payment history on every
/// request.
///
/// Two derivations:
///
/// - **Status**: compares the player's most recent covered dues period
///   against now. Monthly coverage runs to the end of the covered month;
///   annual coverage runs one year from the covered period start.
/// - **Missed months**: walks a sliding window of past months (ending
///   with the previous month) and counts months with no monthly payment,
///   excluding months before the player joined and months before an
///   administrator-set reset timestamp.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use matchday_shared::models::membership::BillingPeriod;
/// use matchday_shared::renewal::{classify_renewal, RenewalStatus};
///
/// let now = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
/// let paid_february = NaiveDate::from_ymd_opt(2025, 2, 1);
///
/// let status = classify_renewal(now, Some(BillingPeriod::Monthly), paid_february, 14);
/// assert_eq!(status, RenewalStatus::Overdue);
/// ```

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::membership::BillingPeriod;

/// Default sliding window for missed-month counting
pub const DEFAULT_MISSED_MONTH_WINDOW: u32 = 12;

/// Where a player stands with their dues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalStatus {
    /// Coverage has run out (or dues were never paid)
    Overdue,

    /// Coverage runs out within the due-soon window
    DueSoon,

    /// Coverage is current
    Ok,

    /// No membership plan, or a plan without recurring dues
    NoPlan,
}

impl RenewalStatus {
    /// Converts the status to its report string
    pub fn as_str(&self) -> &'static str {
        match self {
            RenewalStatus::Overdue => "overdue",
            RenewalStatus::DueSoon => "due_soon",
            RenewalStatus::Ok => "ok",
            RenewalStatus::NoPlan => "no_plan",
        }
    }
}

/// First day of the month containing `date`
fn month_start(date: NaiveDate) -> NaiveDate {
    // with_day(1) cannot fail for a valid date
    date.with_day(1).unwrap()
}

/// Classifies a player's renewal status
///
/// `last_period` is the start of the most recent period covered by a
/// payment of the plan's cadence (the `period` column, not the cashier's
/// timestamp). `due_soon_days` comes from the club settings.
pub fn classify_renewal(
    now: DateTime<Utc>,
    billing: Option<BillingPeriod>,
    last_period: Option<NaiveDate>,
    due_soon_days: i32,
) -> RenewalStatus {
    let billing = match billing {
        Some(b) if b.is_recurring() => b,
        _ => return RenewalStatus::NoPlan,
    };

    let Some(last_period) = last_period else {
        return RenewalStatus::Overdue;
    };

    // Coverage is exclusive of its end date: a February payment covers
    // through the last day of February, an annual payment through the day
    // before its anniversary.
    let coverage_end = match billing {
        BillingPeriod::Monthly => month_start(last_period) + Months::new(1),
        BillingPeriod::Annual => last_period + Months::new(12),
        BillingPeriod::None => unreachable!("filtered above"),
    };

    let today = now.date_naive();
    if today >= coverage_end {
        return RenewalStatus::Overdue;
    }

    let days_left = (coverage_end - today).num_days();
    if days_left <= i64::from(due_soon_days.max(0)) {
        RenewalStatus::DueSoon
    } else {
        RenewalStatus::Ok
    }
}

/// Counts missed monthly dues in a sliding window
///
/// The window is the `window_months` calendar months ending with the
/// month before `now` (the running month is never counted as missed).
/// Months before the player joined, and months before `reset_at` when an
/// administrator has set one, are excluded from the walk.
///
/// `paid_periods` are the `period` values of the player's monthly
/// payments; day-of-month is ignored.
pub fn count_missed_months(
    now: DateTime<Utc>,
    window_months: u32,
    paid_periods: &[NaiveDate],
    joined_at: DateTime<Utc>,
    reset_at: Option<DateTime<Utc>>,
) -> u32 {
    let current_month = month_start(now.date_naive());
    let joined_month = month_start(joined_at.date_naive());
    let reset_month = reset_at.map(|r| month_start(r.date_naive()));

    let paid: Vec<NaiveDate> = paid_periods.iter().copied().map(month_start).collect();

    let mut missed = 0;
    for back in 1..=window_months {
        let Some(month) = current_month.checked_sub_months(Months::new(back)) else {
            break;
        };

        if month < joined_month {
            break;
        }
        if let Some(reset) = reset_month {
            if month < reset {
                break;
            }
        }

        if !paid.contains(&month) {
            missed += 1;
        }
    }

    missed
}
