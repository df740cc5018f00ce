/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `players`: Roster CRUD
/// - `memberships`: Membership plans
/// - `dues`: Club accounting settings
/// - `payments`: Dues payments
/// - `matches`: Matches, VOID/restore, fee computation and collection
/// - `match_payments`: Match-fee records and bulk confirmation
/// - `tag_presets`: Roster tag presets
/// - `upcoming_matches`: Schedule and conversion into played matches
/// - `ref_sessions`: Referee sessions, event log, live SSE tail
/// - `accounting`: Renewal summary, per-match report, export

pub mod accounting;
pub mod dues;
pub mod health;
pub mod match_payments;
pub mod matches;
pub mod memberships;
pub mod payments;
pub mod players;
pub mod ref_sessions;
pub mod tag_presets;
pub mod upcoming_matches;
