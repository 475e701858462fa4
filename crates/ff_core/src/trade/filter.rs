//! Package filters
//!
//! Three filters narrow the trade search: `SendFilter` on the requesting
//! team's packages, `PackageFilter` on the opponent's packages (and on which
//! opponents are considered at all), `ReceiveFilter` on what comes back. Every
//! criterion is optional; an empty list or `None` accepts everything.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::package::Package;
use crate::error::{Result, TradeError};
use crate::league::League;
use crate::models::Team;

pub const DEFAULT_MAX_ASSETS: usize = 2;

pub trait Filter: Send + Sync {
    fn accepts(&self, package: &Package) -> bool;
}

impl<F: Filter> Filter for Option<F> {
    fn accepts(&self, package: &Package) -> bool {
        self.as_ref().map_or(true, |filter| filter.accepts(package))
    }
}

/// Filters applied in order; a package must pass all of them.
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn apply(&self, packages: Vec<Package>) -> Vec<Package> {
        packages.into_iter().filter(|package| self.accepts(package)).collect()
    }
}

impl Filter for FilterPipeline {
    fn accepts(&self, package: &Package) -> bool {
        self.filters.iter().all(|filter| filter.accepts(package))
    }
}

/// Whether any or all of a list of referenced assets must be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainsPolicy {
    #[default]
    Any,
    All,
}

impl ContainsPolicy {
    pub fn exclusive(exclusive: bool) -> Self {
        if exclusive {
            ContainsPolicy::All
        } else {
            ContainsPolicy::Any
        }
    }

    /// Empty reference lists always pass.
    fn check(self, references: &[String], package: &Package) -> bool {
        if references.is_empty() {
            return true;
        }
        match self {
            ContainsPolicy::Any => references.iter().any(|r| package.contains(r)),
            ContainsPolicy::All => references.iter().all(|r| package.contains(r)),
        }
    }
}

fn holds_any(package: &Package, positions: &[String]) -> bool {
    package.iter().any(|asset| positions.iter().any(|pos| asset.holds_position(pos)))
}

fn below_min(package: &Package, min_asset_value: Option<f64>) -> bool {
    min_asset_value.is_some_and(|min| package.iter().any(|asset| asset.value < min))
}

/// Criteria on packages the requesting team sends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendFilter {
    /// At least one sent asset must play one of these positions.
    pub positions: Vec<String>,
    /// No sent asset may play one of these positions.
    pub not_positions: Vec<String>,
    pub assets: Vec<String>,
    pub assets_policy: ContainsPolicy,
    pub not_assets: Vec<String>,
    pub min_asset_value: Option<f64>,
}

impl Filter for SendFilter {
    fn accepts(&self, package: &Package) -> bool {
        if !self.positions.is_empty() && !holds_any(package, &self.positions) {
            return false;
        }
        if holds_any(package, &self.not_positions) {
            return false;
        }
        if self.not_assets.iter().any(|r| package.contains(r)) {
            return false;
        }
        if !self.assets_policy.check(&self.assets, package) {
            return false;
        }
        !below_min(package, self.min_asset_value)
    }
}

/// Requested shape of the opponent's package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageCriteria {
    pub max_assets: usize,
    pub return_contains: Vec<String>,
    pub return_contains_policy: ContainsPolicy,
    pub assets_from_team: Vec<String>,
    pub assets_not_from_team: Vec<String>,
    pub target_positions: Vec<String>,
    pub not_receive_positions: Vec<String>,
}

impl Default for PackageCriteria {
    fn default() -> Self {
        Self {
            max_assets: DEFAULT_MAX_ASSETS,
            return_contains: Vec::new(),
            return_contains_policy: ContainsPolicy::Any,
            assets_from_team: Vec::new(),
            assets_not_from_team: Vec::new(),
            target_positions: Vec::new(),
            not_receive_positions: Vec::new(),
        }
    }
}

/// Package-level filter, also deciding which teams are trade partners.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageFilter {
    criteria: PackageCriteria,
}

impl PackageFilter {
    pub fn new(criteria: PackageCriteria) -> Result<Self> {
        if criteria.max_assets == 0 {
            return Err(TradeError::InvalidParameter("max_assets must be at least 1".into()));
        }
        if !criteria.return_contains.is_empty() && !criteria.target_positions.is_empty() {
            return Err(TradeError::ConfigConflict { first: "return_contains", second: "target_pos" });
        }
        if !criteria.assets_from_team.is_empty() && !criteria.assets_not_from_team.is_empty() {
            return Err(TradeError::ConfigConflict {
                first: "assets_from_team",
                second: "assets_not_from_team",
            });
        }
        Ok(Self { criteria })
    }

    pub fn criteria(&self) -> &PackageCriteria {
        &self.criteria
    }

    pub fn max_assets(&self) -> usize {
        self.criteria.max_assets
    }

    /// Teams (the requester included) that could supply an acceptable package.
    ///
    /// Named teams if given, otherwise owners of a `return_contains` asset,
    /// otherwise the whole league. Excluded teams are removed next, and with
    /// target positions only teams owning such a player (or any pick) remain.
    pub fn matching_teams<'a>(&self, league: &'a League) -> Result<Vec<&'a Arc<Team>>> {
        let criteria = &self.criteria;
        let mut teams: Vec<&Arc<Team>> = if !criteria.assets_from_team.is_empty() {
            let mut named = Vec::new();
            for name in &criteria.assets_from_team {
                let team = league.team_by_name(name)?;
                if !named.iter().any(|t: &&Arc<Team>| t.name() == team.name()) {
                    named.push(team);
                }
            }
            named
        } else if !criteria.return_contains.is_empty() {
            league
                .teams()
                .iter()
                .filter(|team| criteria.return_contains.iter().any(|r| team.find(r).is_some()))
                .collect()
        } else {
            league.teams().iter().collect()
        };

        for name in &criteria.assets_not_from_team {
            let excluded = league.team_by_name(name)?;
            teams.retain(|team| team.name() != excluded.name());
        }

        if !criteria.target_positions.is_empty() {
            teams.retain(|team| {
                team.assets().iter().any(|asset| {
                    asset.is_pick()
                        || criteria.target_positions.iter().any(|pos| asset.holds_position(pos))
                })
            });
        }
        Ok(teams)
    }
}

impl Filter for PackageFilter {
    fn accepts(&self, package: &Package) -> bool {
        let criteria = &self.criteria;
        if package.len() > criteria.max_assets {
            return false;
        }
        if !criteria.return_contains_policy.check(&criteria.return_contains, package) {
            return false;
        }
        let positions = package.positions();
        if !criteria.target_positions.is_empty() {
            let hit = positions.iter().any(|pos| match pos {
                None => true,
                Some(pos) => criteria.target_positions.iter().any(|target| target == pos),
            });
            if !hit {
                return false;
            }
        }
        !positions
            .iter()
            .flatten()
            .any(|pos| criteria.not_receive_positions.iter().any(|denied| denied == pos))
    }
}

/// Criteria on what the requesting team receives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiveFilter {
    pub min_asset_value: Option<f64>,
    pub return_does_not_contain: Vec<String>,
    pub return_not_positions: Vec<String>,
    pub exclude_picks: bool,
}

impl Filter for ReceiveFilter {
    fn accepts(&self, package: &Package) -> bool {
        if holds_any(package, &self.return_not_positions) {
            return false;
        }
        if self.exclude_picks && package.iter().any(|asset| asset.is_pick()) {
            return false;
        }
        if self.return_does_not_contain.iter().any(|r| package.contains(r)) {
            return false;
        }
        !below_min(package, self.min_asset_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::AssetRecord;
    use crate::lineup::{RosterValuer, ValuationStrategy};
    use crate::models::{Asset, SlotTemplate};

    fn player(name: &str, pos: &str, value: f64) -> Arc<Asset> {
        Arc::new(Asset::player(name, name, pos, value, "t").unwrap())
    }

    fn pick(name: &str, value: f64) -> Arc<Asset> {
        Arc::new(Asset::pick(name, name, value, "t").unwrap())
    }

    fn package(assets: &[&Arc<Asset>]) -> Package {
        Package::new(assets.iter().map(|a| Arc::clone(a)).collect())
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_absent_criteria_accept_everything() {
        let qb = player("qb", "QB", 1.0);
        let p = package(&[&qb]);
        assert!(SendFilter::default().accepts(&p));
        assert!(ReceiveFilter::default().accepts(&p));
        assert!(PackageFilter::new(PackageCriteria::default()).unwrap().accepts(&p));
        assert!(None::<SendFilter>.accepts(&p));
        assert!(FilterPipeline::new().accepts(&p));
    }

    #[test]
    fn test_send_filter() {
        let qb = player("qb", "QB", 5.0);
        let rb = player("rb", "RB", 2.0);
        let both = package(&[&qb, &rb]);

        let by_pos = SendFilter { positions: strings(&["RB"]), ..Default::default() };
        assert!(by_pos.accepts(&both));
        assert!(!by_pos.accepts(&package(&[&qb])));

        let not_pos = SendFilter { not_positions: strings(&["RB"]), ..Default::default() };
        assert!(!not_pos.accepts(&both));

        let not_assets = SendFilter { not_assets: strings(&["qb"]), ..Default::default() };
        assert!(!not_assets.accepts(&both));
        assert!(not_assets.accepts(&package(&[&rb])));

        let all = SendFilter {
            assets: strings(&["qb", "rb"]),
            assets_policy: ContainsPolicy::All,
            ..Default::default()
        };
        assert!(all.accepts(&both));
        assert!(!all.accepts(&package(&[&qb])));
        let any = SendFilter { assets_policy: ContainsPolicy::Any, ..all };
        assert!(any.accepts(&package(&[&qb])));

        let min = SendFilter { min_asset_value: Some(3.0), ..Default::default() };
        assert!(!min.accepts(&both));
        assert!(min.accepts(&package(&[&qb])));
    }

    #[test]
    fn test_package_filter_conflicts() {
        let conflict = PackageFilter::new(PackageCriteria {
            return_contains: strings(&["x"]),
            target_positions: strings(&["QB"]),
            ..Default::default()
        });
        assert_eq!(
            conflict.unwrap_err(),
            TradeError::ConfigConflict { first: "return_contains", second: "target_pos" }
        );
        let teams = PackageFilter::new(PackageCriteria {
            assets_from_team: strings(&["a"]),
            assets_not_from_team: strings(&["b"]),
            ..Default::default()
        });
        assert!(teams.unwrap_err().is_config_error());
        let zero = PackageFilter::new(PackageCriteria { max_assets: 0, ..Default::default() });
        assert!(matches!(zero, Err(TradeError::InvalidParameter(_))));
    }

    #[test]
    fn test_package_filter_positions() {
        let qb = player("qb", "QB", 5.0);
        let rb = player("rb", "RB", 2.0);
        let first = pick("2025 1st", 3.0);

        let target = PackageFilter::new(PackageCriteria {
            target_positions: strings(&["QB"]),
            ..Default::default()
        })
        .unwrap();
        assert!(target.accepts(&package(&[&qb])));
        assert!(!target.accepts(&package(&[&rb])));
        // Picks always overlap the target list.
        assert!(target.accepts(&package(&[&first])));

        let denied = PackageFilter::new(PackageCriteria {
            not_receive_positions: strings(&["RB"]),
            ..Default::default()
        })
        .unwrap();
        assert!(!denied.accepts(&package(&[&qb, &rb])));
        assert!(denied.accepts(&package(&[&qb, &first])));

        let small = PackageFilter::new(PackageCriteria { max_assets: 1, ..Default::default() })
            .unwrap();
        assert!(!small.accepts(&package(&[&qb, &rb])));
    }

    #[test]
    fn test_package_filter_return_contains() {
        let qb = player("qb", "QB", 5.0);
        let rb = player("rb", "RB", 2.0);
        let all = PackageFilter::new(PackageCriteria {
            return_contains: strings(&["qb", "rb"]),
            return_contains_policy: ContainsPolicy::All,
            ..Default::default()
        })
        .unwrap();
        assert!(all.accepts(&package(&[&qb, &rb])));
        assert!(!all.accepts(&package(&[&qb])));
    }

    #[test]
    fn test_receive_filter() {
        let qb = player("qb", "QB", 5.0);
        let rb = player("rb", "RB", 2.0);
        let first = pick("2025 1st", 3.0);

        let not_pos = ReceiveFilter { return_not_positions: strings(&["QB"]), ..Default::default() };
        assert!(!not_pos.accepts(&package(&[&qb])));
        assert!(not_pos.accepts(&package(&[&rb, &first])));

        let no_picks = ReceiveFilter { exclude_picks: true, ..Default::default() };
        assert!(!no_picks.accepts(&package(&[&rb, &first])));

        let not_contain =
            ReceiveFilter { return_does_not_contain: strings(&["rb"]), ..Default::default() };
        assert!(!not_contain.accepts(&package(&[&rb])));

        let min = ReceiveFilter { min_asset_value: Some(2.5), ..Default::default() };
        assert!(!min.accepts(&package(&[&rb])));
        assert!(min.accepts(&package(&[&qb, &first])));
    }

    #[test]
    fn test_pipeline_applies_all() {
        let qb = player("qb", "QB", 5.0);
        let rb = player("rb", "RB", 2.0);
        let pipeline = FilterPipeline::new()
            .with(SendFilter { positions: strings(&["QB", "RB"]), ..Default::default() })
            .with(Some(ReceiveFilter { min_asset_value: Some(3.0), ..Default::default() }));
        assert_eq!(pipeline.len(), 2);
        let kept = pipeline.apply(vec![package(&[&qb]), package(&[&rb]), package(&[&qb, &rb])]);
        assert_eq!(kept, vec![package(&[&qb])]);
    }

    fn league() -> League {
        let records = vec![
            AssetRecord::new("1", "qb-1", Some("QB"), 5.0, "team1"),
            AssetRecord::new("2", "qb-2", Some("QB"), 5.0, "team2"),
            AssetRecord::new("3", "rb-3", Some("RB"), 5.0, "team3"),
            AssetRecord::new("4", "wr-4", Some("WR"), 5.0, "team4"),
            AssetRecord::new("5", "pick-4", None, 5.0, "team4"),
        ];
        let valuer = RosterValuer::new(
            SlotTemplate::new(&[("QB", 1)], 0).unwrap(),
            ValuationStrategy::DepthChart,
        );
        League::from_records(&records, valuer).unwrap()
    }

    fn names(teams: Vec<&Arc<Team>>) -> Vec<&str> {
        teams.into_iter().map(|team| team.name()).collect()
    }

    #[test]
    fn test_matching_teams() {
        let league = league();
        let everyone = PackageFilter::new(PackageCriteria::default()).unwrap();
        assert_eq!(names(everyone.matching_teams(&league).unwrap()).len(), 4);

        let from = PackageFilter::new(PackageCriteria {
            assets_from_team: strings(&["team3", "team3"]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(names(from.matching_teams(&league).unwrap()), vec!["team3"]);

        let owners = PackageFilter::new(PackageCriteria {
            return_contains: strings(&["qb-2", "nobody"]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(names(owners.matching_teams(&league).unwrap()), vec!["team2"]);

        let not_from = PackageFilter::new(PackageCriteria {
            assets_not_from_team: strings(&["team2"]),
            target_positions: strings(&["QB"]),
            ..Default::default()
        })
        .unwrap();
        // team4 stays for its pick.
        assert_eq!(names(not_from.matching_teams(&league).unwrap()), vec!["team1", "team4"]);
    }

    #[test]
    fn test_matching_teams_unknown_name() {
        let league = league();
        let unknown = PackageFilter::new(PackageCriteria {
            assets_from_team: strings(&["Somebody"]),
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(unknown.matching_teams(&league), Err(TradeError::UnknownTeam { .. })));
    }
}
