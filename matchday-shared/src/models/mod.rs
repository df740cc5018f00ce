/// Database models for matchday
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `player`: Roster entries (members and guests)
/// - `membership`: Membership plans with billing cadence
/// - `dues_settings`: Club-wide accounting settings (single row)
/// - `matches`: Played matches with attendance and fee bookkeeping
/// - `payment`: Dues payments (monthly/annual)
/// - `match_payment`: Per-match per-player fee records
/// - `tag_preset`: Named tag lists for roster filtering
/// - `upcoming_match`: Scheduled matches with RSVP lists
/// - `ref_session`: Referee match-day sessions
/// - `ref_event`: Append-only event log per referee session
///
/// # Example
///
/// ```no_run
/// use matchday_shared::models::player::{CreatePlayer, Player};
/// use matchday_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let player = Player::create(&pool, CreatePlayer {
///     name: "Jonas Weber".to_string(),
///     nickname: None,
///     membership_id: None,
///     is_guest: false,
///     tags: vec!["defense".to_string()],
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod dues_settings;
pub mod match_payment;
pub mod matches;
pub mod membership;
pub mod payment;
pub mod player;
pub mod ref_event;
pub mod ref_session;
pub mod tag_preset;
pub mod upcoming_match;
