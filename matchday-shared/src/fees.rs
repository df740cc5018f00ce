/// Match-fee split calculation
///
/// Splits a match's venue cost between attending members and guests.
/// Guests pay the member fee plus a surcharge; the member fee is rounded
/// to the nearest 0.5 currency units so cash collection stays practical.
///
/// # Override precedence
///
/// Inputs resolve in this order, highest first:
///
/// 1. Explicit venue-total override
/// 2. Explicit member-fee override (with an optional surcharge override)
/// 3. Fees stored on the match (`member_fee` / `guest_surcharge`)
/// 4. Recomputation from the match's stored `total_cost`
///
/// The guest surcharge resolves independently: override, then the match's
/// stored value, then the club default. Missing numeric inputs count as
/// zero; there are no error cases.
///
/// # Example
///
/// ```
/// use matchday_shared::fees::{calculate_match_fees, FeeInputs, FeeOverrides};
///
/// // 10 members and 2 guests split a 65.00 pitch, guests pay +2.50
/// let breakdown = calculate_match_fees(FeeInputs {
///     member_count: 10,
///     guest_count: 2,
///     stored_total_cost: Some(65.0),
///     default_guest_surcharge: 2.5,
///     ..Default::default()
/// });
///
/// assert_eq!(breakdown.member_fee, 5.0);
/// assert_eq!(breakdown.guest_fee, 7.5);
/// ```

use serde::{Deserialize, Serialize};

/// Member fees are rounded to the nearest half currency unit
pub const FEE_ROUNDING_UNIT: f64 = 0.5;

/// Explicit overrides supplied by the caller (query parameters in the API)
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct FeeOverrides {
    /// Venue-total override; wins over everything else
    pub total: Option<f64>,

    /// Member-fee override; wins over match-stored fees
    pub member_fee: Option<f64>,

    /// Guest-surcharge override
    pub guest_surcharge: Option<f64>,
}

/// Everything the fee split depends on
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeInputs {
    /// Attending members
    pub member_count: u32,

    /// Attending guests
    pub guest_count: u32,

    /// The match's stored venue cost
    pub stored_total_cost: Option<f64>,

    /// The match's stored per-member fee
    pub stored_member_fee: Option<f64>,

    /// The match's stored guest surcharge
    pub stored_guest_surcharge: Option<f64>,

    /// Club-wide default guest surcharge (dues settings)
    pub default_guest_surcharge: f64,

    /// Caller overrides
    pub overrides: FeeOverrides,
}

/// Result of the fee split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Fee each member pays
    pub member_fee: f64,

    /// Fee each guest pays (member fee + surcharge)
    pub guest_fee: f64,

    /// What collecting these fees yields across all attendees
    pub collected_total: f64,
}

impl FeeBreakdown {
    /// All-zero breakdown (no participants or nothing to split)
    pub fn zero() -> Self {
        FeeBreakdown {
            member_fee: 0.0,
            guest_fee: 0.0,
            collected_total: 0.0,
        }
    }
}

/// Rounds to the nearest fee rounding unit
fn round_to_unit(value: f64) -> f64 {
    (value / FEE_ROUNDING_UNIT).round() * FEE_ROUNDING_UNIT
}

/// Computes the per-member and per-guest fee for a match
///
/// See the module docs for the override precedence. Zero participants or
/// a zero/absent total yields an all-zero breakdown.
pub fn calculate_match_fees(inputs: FeeInputs) -> FeeBreakdown {
    let members = f64::from(inputs.member_count);
    let guests = f64::from(inputs.guest_count);
    let participants = members + guests;

    if participants <= 0.0 {
        return FeeBreakdown::zero();
    }

    let surcharge = inputs
        .overrides
        .guest_surcharge
        .or(inputs.stored_guest_surcharge)
        .unwrap_or(inputs.default_guest_surcharge)
        .max(0.0);

    // Tier 1: explicit total override
    if let Some(total) = inputs.overrides.total {
        return split_from_total(total, members, guests, surcharge);
    }

    // Tier 2: explicit member-fee override
    if let Some(member_fee) = inputs.overrides.member_fee {
        return from_member_fee(member_fee, members, guests, surcharge);
    }

    // Tier 3: fees stored on the match
    if let Some(member_fee) = inputs.stored_member_fee {
        return from_member_fee(member_fee, members, guests, surcharge);
    }

    // Tier 4: recompute from the stored venue cost (missing counts as 0)
    let total = inputs.stored_total_cost.unwrap_or(0.0);
    split_from_total(total, members, guests, surcharge)
}

/// Solves the member fee from a venue total
///
/// `total = member_fee * members + (member_fee + surcharge) * guests`,
/// so the guests' surcharge is taken off the top and the rest is split
/// evenly, then rounded.
fn split_from_total(total: f64, members: f64, guests: f64, surcharge: f64) -> FeeBreakdown {
    if total <= 0.0 {
        return FeeBreakdown::zero();
    }

    let participants = members + guests;
    let member_fee = round_to_unit((total - surcharge * guests) / participants).max(0.0);
    let guest_fee = member_fee + surcharge;

    FeeBreakdown {
        member_fee,
        guest_fee,
        collected_total: member_fee * members + guest_fee * guests,
    }
}

/// Builds the breakdown from an explicit per-member fee
fn from_member_fee(member_fee: f64, members: f64, guests: f64, surcharge: f64) -> FeeBreakdown {
    let member_fee = member_fee.max(0.0);
    let guest_fee = member_fee + surcharge;

    FeeBreakdown {
        member_fee,
        guest_fee,
        collected_total: member_fee * members + guest_fee * guests,
    }
}

/// Returns the fee a single player owes for a match
///
/// Guests owe the guest fee, everyone else the member fee.
pub fn calculate_player_match_fee(is_guest: bool, breakdown: &FeeBreakdown) -> f64 {
    if is_guest {
        breakdown.guest_fee
    } else {
        breakdown.member_fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(members: u32, guests: u32) -> FeeInputs {
        FeeInputs {
            member_count: members,
            guest_count: guests,
            ..Default::default()
        }
    }

    #[test]
    fn test_even_split_from_total() {
        let breakdown = calculate_match_fees(FeeInputs {
            stored_total_cost: Some(65.0),
            default_guest_surcharge: 2.5,
            ..inputs(10, 2)
        });

        // (65 - 2.5*2) / 12 = 5.0 exactly
        assert_eq!(breakdown.member_fee, 5.0);
        assert_eq!(breakdown.guest_fee, 7.5);
        assert_eq!(breakdown.collected_total, 65.0);
    }

    #[test]
    fn test_member_fee_rounds_to_half_unit() {
        let breakdown = calculate_match_fees(FeeInputs {
            stored_total_cost: Some(70.0),
            default_guest_surcharge: 2.0,
            ..inputs(9, 2)
        });

        // (70 - 4) / 11 = 6.0, exact; nudge the total so rounding kicks in
        assert_eq!(breakdown.member_fee, 6.0);

        let breakdown = calculate_match_fees(FeeInputs {
            stored_total_cost: Some(73.0),
            default_guest_surcharge: 2.0,
            ..inputs(9, 2)
        });

        // (73 - 4) / 11 = 6.27... -> 6.5
        assert_eq!(breakdown.member_fee, 6.5);
        assert_eq!(breakdown.guest_fee, 8.5);
    }

    #[test]
    fn test_collected_total_within_half_unit_per_participant() {
        // Sweep a range of totals and rosters; the rounded collection may
        // deviate from the venue total by at most half the rounding unit
        // per participant.
        for total in [10.0, 33.0, 47.5, 61.0, 88.25, 120.0] {
            for members in 1..=15u32 {
                for guests in 0..=4u32 {
                    let breakdown = calculate_match_fees(FeeInputs {
                        stored_total_cost: Some(total),
                        default_guest_surcharge: 2.5,
                        ..inputs(members, guests)
                    });

                    let participants = f64::from(members + guests);
                    let tolerance = FEE_ROUNDING_UNIT / 2.0 * participants + 1e-9;
                    assert!(
                        (breakdown.collected_total - total).abs() <= tolerance,
                        "total {total}, {members}m/{guests}g: collected {} off by more than {tolerance}",
                        breakdown.collected_total
                    );
                }
            }
        }
    }

    #[test]
    fn test_guest_fee_minus_member_fee_is_surcharge() {
        for surcharge in [0.0, 1.0, 2.5, 3.75] {
            let breakdown = calculate_match_fees(FeeInputs {
                stored_total_cost: Some(50.0),
                default_guest_surcharge: surcharge,
                ..inputs(8, 3)
            });

            assert!((breakdown.guest_fee - breakdown.member_fee - surcharge).abs() < 1e-9);
        }
    }

    #[test]
    fn test_total_override_beats_everything() {
        let breakdown = calculate_match_fees(FeeInputs {
            stored_total_cost: Some(100.0),
            stored_member_fee: Some(9.0),
            overrides: FeeOverrides {
                total: Some(40.0),
                member_fee: Some(99.0),
                guest_surcharge: None,
            },
            default_guest_surcharge: 0.0,
            ..inputs(8, 0)
        });

        // 40 / 8 = 5.0; the member-fee override and stored values lose
        assert_eq!(breakdown.member_fee, 5.0);
        assert_eq!(breakdown.collected_total, 40.0);
    }

    #[test]
    fn test_member_fee_override_beats_stored_fees() {
        let breakdown = calculate_match_fees(FeeInputs {
            stored_total_cost: Some(100.0),
            stored_member_fee: Some(9.0),
            stored_guest_surcharge: Some(1.0),
            overrides: FeeOverrides {
                total: None,
                member_fee: Some(4.0),
                guest_surcharge: Some(3.0),
            },
            default_guest_surcharge: 2.0,
            ..inputs(6, 2)
        });

        assert_eq!(breakdown.member_fee, 4.0);
        assert_eq!(breakdown.guest_fee, 7.0);
        assert_eq!(breakdown.collected_total, 4.0 * 6.0 + 7.0 * 2.0);
    }

    #[test]
    fn test_stored_member_fee_beats_total_cost() {
        let breakdown = calculate_match_fees(FeeInputs {
            stored_total_cost: Some(100.0),
            stored_member_fee: Some(6.0),
            stored_guest_surcharge: Some(2.0),
            ..inputs(10, 1)
        });

        assert_eq!(breakdown.member_fee, 6.0);
        assert_eq!(breakdown.guest_fee, 8.0);
    }

    #[test]
    fn test_surcharge_resolution_chain() {
        // Override wins
        let breakdown = calculate_match_fees(FeeInputs {
            stored_member_fee: Some(5.0),
            stored_guest_surcharge: Some(1.0),
            overrides: FeeOverrides {
                guest_surcharge: Some(4.0),
                ..Default::default()
            },
            default_guest_surcharge: 2.0,
            ..inputs(5, 1)
        });
        assert_eq!(breakdown.guest_fee, 9.0);

        // Stored wins over the default
        let breakdown = calculate_match_fees(FeeInputs {
            stored_member_fee: Some(5.0),
            stored_guest_surcharge: Some(1.0),
            default_guest_surcharge: 2.0,
            ..inputs(5, 1)
        });
        assert_eq!(breakdown.guest_fee, 6.0);

        // Default applies last
        let breakdown = calculate_match_fees(FeeInputs {
            stored_member_fee: Some(5.0),
            default_guest_surcharge: 2.0,
            ..inputs(5, 1)
        });
        assert_eq!(breakdown.guest_fee, 7.0);
    }

    #[test]
    fn test_zero_participants_yields_zero() {
        let breakdown = calculate_match_fees(FeeInputs {
            stored_total_cost: Some(80.0),
            default_guest_surcharge: 2.5,
            ..inputs(0, 0)
        });

        assert_eq!(breakdown, FeeBreakdown::zero());
    }

    #[test]
    fn test_zero_total_yields_zero() {
        let breakdown = calculate_match_fees(FeeInputs {
            stored_total_cost: Some(0.0),
            default_guest_surcharge: 2.5,
            ..inputs(10, 2)
        });

        assert_eq!(breakdown, FeeBreakdown::zero());
    }

    #[test]
    fn test_missing_total_counts_as_zero() {
        let breakdown = calculate_match_fees(FeeInputs {
            default_guest_surcharge: 2.5,
            ..inputs(10, 2)
        });

        assert_eq!(breakdown, FeeBreakdown::zero());
    }

    #[test]
    fn test_guest_heavy_total_clamps_member_fee_at_zero() {
        // Surcharge alone exceeds the total; the member fee floors at zero
        // instead of going negative.
        let breakdown = calculate_match_fees(FeeInputs {
            stored_total_cost: Some(3.0),
            default_guest_surcharge: 5.0,
            ..inputs(2, 4)
        });

        assert_eq!(breakdown.member_fee, 0.0);
        assert_eq!(breakdown.guest_fee, 5.0);
    }

    #[test]
    fn test_guests_only() {
        let breakdown = calculate_match_fees(FeeInputs {
            stored_total_cost: Some(30.0),
            default_guest_surcharge: 2.0,
            ..inputs(0, 4)
        });

        // (30 - 8) / 4 = 5.5
        assert_eq!(breakdown.member_fee, 5.5);
        assert_eq!(breakdown.guest_fee, 7.5);
        assert_eq!(breakdown.collected_total, 30.0);
    }

    #[test]
    fn test_player_fee_by_guest_flag() {
        let breakdown = FeeBreakdown {
            member_fee: 5.0,
            guest_fee: 7.5,
            collected_total: 0.0,
        };

        assert_eq!(calculate_player_match_fee(false, &breakdown), 5.0);
        assert_eq!(calculate_player_match_fee(true, &breakdown), 7.5);
    }

    #[test]
    fn test_round_to_unit() {
        assert_eq!(round_to_unit(5.24), 5.0);
        assert_eq!(round_to_unit(5.25), 5.5);
        assert_eq!(round_to_unit(5.74), 5.5);
        assert_eq!(round_to_unit(5.75), 6.0);
        assert_eq!(round_to_unit(0.0), 0.0);
    }
}
