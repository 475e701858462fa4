//! Trade search
//!
//! Packages are assembled from each roster, narrowed by the filter pipeline,
//! paired across teams, executed against the league's `RosterValuer` and
//! ranked by gain.

pub mod filter;
pub mod finder;
pub mod package;
pub mod rank;
#[allow(clippy::module_inception)]
pub mod trade;

pub use filter::{
    ContainsPolicy, Filter, FilterPipeline, PackageCriteria, PackageFilter, ReceiveFilter, SendFilter,
    DEFAULT_MAX_ASSETS,
};
pub use finder::{TradeFilters, TradeFinder};
pub use package::{assemble, Package};
pub use rank::{rank_and_filter, RankOptions};
pub use trade::{Trade, TradeOutcome};
