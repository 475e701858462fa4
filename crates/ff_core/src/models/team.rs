use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;

use super::Asset;
use crate::error::{Result, TradeError};

/// A named collection of assets.
///
/// The lineup is never stored on the team; ask a `RosterValuer` for it.
#[derive(Debug, Clone)]
pub struct Team {
    name: String,
    assets: Vec<Arc<Asset>>,
}

impl Team {
    pub fn new(name: impl Into<String>, assets: Vec<Arc<Asset>>) -> Result<Self> {
        let name = name.into().trim().to_string();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for asset in &assets {
            if !seen.insert(asset.id.as_str()) {
                return Err(TradeError::DuplicateAsset { asset: asset.name.clone(), team: name });
            }
        }
        Ok(Self { name, assets })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn assets(&self) -> &[Arc<Asset>] {
        &self.assets
    }

    /// Assets ordered by value, highest first (ties keep roster order).
    pub fn sorted_assets(&self) -> Vec<Arc<Asset>> {
        let mut sorted = self.assets.clone();
        sorted.sort_by(|a, b| b.value.total_cmp(&a.value));
        sorted
    }

    pub fn owns(&self, asset: &Asset) -> bool {
        self.assets.iter().any(|owned| owned.id == asset.id)
    }

    pub fn find(&self, reference: &str) -> Option<&Arc<Asset>> {
        self.assets.iter().find(|asset| asset.matches(reference))
    }

    /// New team with `sent` removed and `received` added.
    ///
    /// Received assets are rebuilt under this team's name; the originals stay
    /// with their old team.
    pub fn exchange(&self, sent: &[Arc<Asset>], received: &[Arc<Asset>]) -> Result<Team> {
        let mut assets = self.assets.clone();
        for asset in sent {
            match assets.iter().position(|owned| owned.id == asset.id) {
                Some(i) => {
                    assets.remove(i);
                }
                None => {
                    return Err(TradeError::AssetNotOwned {
                        asset: asset.name.clone(),
                        team: self.name.clone(),
                    });
                }
            }
        }
        assets.extend(received.iter().map(|asset| self.adopt(asset)));
        Team::new(self.name.clone(), assets)
    }

    fn adopt(&self, asset: &Arc<Asset>) -> Arc<Asset> {
        if asset.team_name == self.name {
            return Arc::clone(asset);
        }
        Arc::new(Asset { team_name: self.name.clone(), ..Asset::clone(asset) })
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Team: {}", self.name)
    }
}
