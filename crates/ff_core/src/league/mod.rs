//! League: every team and asset, plus team lookup
//!
//! Teams are kept sorted by name so that iteration (and therefore trade
//! generation) is reproducible.

pub mod names;
pub mod record;

pub use names::{fuzzy_find, resolve, similarity, TEAM_NAME_MATCH_CAP};
pub use record::AssetRecord;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Result, TradeError};
use crate::lineup::{RosterValuer, TeamValuation};
use crate::models::{Asset, Team};

/// Team identifier in a request: position in the league or a (fuzzy) name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamRef {
    Index(usize),
    Name(String),
}

impl From<&str> for TeamRef {
    fn from(name: &str) -> Self {
        TeamRef::Name(name.to_string())
    }
}

impl From<usize> for TeamRef {
    fn from(index: usize) -> Self {
        TeamRef::Index(index)
    }
}

impl fmt::Display for TeamRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TeamRef::Index(i) => write!(f, "#{}", i),
            TeamRef::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct League {
    teams: Vec<Arc<Team>>,
    asset_index: FxHashMap<String, Arc<Asset>>,
    valuer: RosterValuer,
    name_threshold: f64,
}

impl League {
    /// Builds teams from records, grouping by the record's team string.
    pub fn from_records(records: &[AssetRecord], valuer: RosterValuer) -> Result<Self> {
        Self::build(records, valuer, |raw| Ok(raw.trim().to_string()))
    }

    /// Like `from_records`, reconciling each raw team string against the
    /// canonical names first (see `names::resolve`).
    pub fn from_records_with_names<S: AsRef<str>>(
        records: &[AssetRecord],
        canonical_names: &[S],
        valuer: RosterValuer,
    ) -> Result<Self> {
        let mut mapping: FxHashMap<String, String> = FxHashMap::default();
        for record in records {
            if !mapping.contains_key(&record.team) {
                let canonical = resolve(&record.team, canonical_names)?;
                if canonical != record.team {
                    debug!(raw = %record.team, %canonical, "reconciled team name");
                }
                mapping.insert(record.team.clone(), canonical);
            }
        }
        Self::build(records, valuer, |raw| {
            mapping.get(raw).cloned().ok_or_else(|| TradeError::UnknownTeam {
                query: raw.to_string(),
                options: Vec::new(),
            })
        })
    }

    fn build<F>(records: &[AssetRecord], valuer: RosterValuer, team_name: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String>,
    {
        let mut grouped: BTreeMap<String, Vec<Arc<Asset>>> = BTreeMap::new();
        let mut asset_index: FxHashMap<String, Arc<Asset>> = FxHashMap::default();
        let mut skipped = 0usize;

        for record in records {
            let team = team_name(&record.team)?;
            let Some(asset) = record.to_asset(&team)? else {
                skipped += 1;
                continue;
            };
            let asset = Arc::new(asset);
            if asset_index.insert(asset.id.clone(), Arc::clone(&asset)).is_some() {
                return Err(TradeError::DuplicateAsset { asset: asset.name.clone(), team });
            }
            grouped.entry(team).or_default().push(asset);
        }

        if skipped > 0 {
            warn!(skipped, "dropped records without a value");
        }

        let teams = grouped
            .into_iter()
            .map(|(name, assets)| Team::new(name, assets).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;

        info!(teams = teams.len(), assets = asset_index.len(), "league built");
        Ok(Self { teams, asset_index, valuer, name_threshold: TEAM_NAME_MATCH_CAP })
    }

    pub fn with_name_threshold(mut self, threshold: f64) -> Self {
        self.name_threshold = threshold;
        self
    }

    pub fn valuer(&self) -> &RosterValuer {
        &self.valuer
    }

    pub fn teams(&self) -> &[Arc<Team>] {
        &self.teams
    }

    pub fn team_names(&self) -> Vec<&str> {
        self.teams.iter().map(|team| team.name()).collect()
    }

    /// All assets, team by team.
    pub fn assets(&self) -> impl Iterator<Item = &Arc<Asset>> {
        self.teams.iter().flat_map(|team| team.assets().iter())
    }

    /// Asset by id, falling back to a name match.
    pub fn asset(&self, reference: &str) -> Option<&Arc<Asset>> {
        self.asset_index
            .get(reference)
            .or_else(|| self.assets().find(|asset| asset.matches(reference)))
    }

    pub fn team(&self, team: &TeamRef) -> Result<&Arc<Team>> {
        match team {
            TeamRef::Index(i) => self.teams.get(*i).ok_or_else(|| TradeError::UnknownTeam {
                query: team.to_string(),
                options: self.team_names().into_iter().map(str::to_string).collect(),
            }),
            TeamRef::Name(name) => self.team_by_name(name),
        }
    }

    /// Fuzzy lookup; fails when the name is too broad or matches nothing.
    pub fn team_by_name(&self, name: &str) -> Result<&Arc<Team>> {
        let names = self.team_names();
        let i = fuzzy_find(name.trim(), &names, self.name_threshold)?;
        Ok(&self.teams[i])
    }

    pub fn team_exact(&self, name: &str) -> Option<&Arc<Team>> {
        self.teams.iter().find(|team| team.name() == name)
    }

    pub fn evaluate(&self, team: &Team) -> TeamValuation {
        self.valuer.evaluate(team)
    }

    /// Every team's value under the league's valuer, highest first.
    pub fn standings(&self) -> Vec<(String, f64)> {
        let mut values: Vec<(String, f64)> = self
            .teams
            .par_iter()
            .map(|team| (team.name().to_string(), self.valuer.evaluate(team).value))
            .collect();
        values.sort_by(|a, b| b.1.total_cmp(&a.1));
        values
    }
}
