//! # ff_core - Fantasy League Lineup & Trade Engine
//!
//! Deterministic lineup assignment and trade evaluation for roster-based
//! fantasy leagues.
//!
//! ## Features
//! - Greedy slot assignment with FLEX/SUPERFLEX categories and depth charts
//! - Pluggable team valuation (`DepthChart`, `BenchWeighted`)
//! - Package assembly with send/package/receive filters
//! - Parallel trade execution and gain-based ranking
//! - Serde-loadable league profiles and trade requests
//!
//! No I/O happens here; loading files and rendering results is left to the
//! caller.

pub mod config;
pub mod error;
pub mod league;
pub mod lineup;
pub mod models;
pub mod trade;

pub use config::{LeagueProfile, TradeRequest, REQUEST_KEYS};
pub use error::{Result, TradeError};
pub use league::{AssetRecord, League, TeamRef};
pub use lineup::{Lineup, RosterValuer, SlotAssigner, TeamValuation, ValuationStrategy};
pub use models::{Asset, AssetKind, EligibilityConfig, SlotCategory, SlotKey, SlotTemplate, Team};
pub use trade::{
    ContainsPolicy, Filter, FilterPipeline, Package, PackageFilter, RankOptions, ReceiveFilter,
    SendFilter, Trade, TradeFilters, TradeFinder, TradeOutcome,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
