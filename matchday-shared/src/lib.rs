//! # Matchday Shared Library
//!
//! This crate contains the database layer, models, and accounting logic
//! shared across the matchday API server and its tests.
//!
//! ## Module Organization
//!
//! - `db`: Connection pooling and migrations
//! - `models`: Database models and their CRUD operations
//! - `fees`: Match-fee split calculation
//! - `renewal`: Dues renewal status and missed-month derivation

pub mod db;
pub mod fees;
pub mod models;
pub mod renewal;

/// Current version of the matchday shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
