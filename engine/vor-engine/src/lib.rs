//! # VOR Engine
//!
//! Value-over-replacement draft boards for fantasy football.
//!
//! Season scoring totals and a league format go in; a tiered board comes out.
//! For each rostered position the engine finds the replacement-level score
//! (the best player who would not start for any team), measures every player
//! against it, splits each position into tiers, and can blend in market ADP
//! to show value relative to draft cost.
//!
//! Everything here is synchronous and side-effect free apart from logging.
//! Fetching stats, storing tables and rendering boards belong to callers.

pub mod adp;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod replacement;
pub mod scoring;
pub mod table;
pub mod tiering;


pub use config::BoardConfig;
pub use engine::{compute_vor_with_tiers, BoardEngine, BoardOrder};
pub use error::{BoardError, Result};
pub use models::*;
pub use table::Table;
pub use tiering::{FixedWidthTiers, QuantileTiers, TierMethod, TierPolicy};

/// Default number of teams in a league
pub const DEFAULT_NUM_TEAMS: u32 = 12;

/// Default quantile tier fraction (five bands)
pub const DEFAULT_QUANTILE: f64 = 0.2;

/// Default points per tier for fixed-width tiering
pub const DEFAULT_TIER_WIDTH: f64 = 20.0;
