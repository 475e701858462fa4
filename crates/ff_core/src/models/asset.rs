use serde::{Deserialize, Serialize};
use std::fmt;

use super::slot::EligibilitySet;
use crate::error::{Result, TradeError};

/// What kind of thing a team owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetKind {
    Player { position: String },
    /// Draft pick: has no position and may fill any slot category.
    Pick,
}

/// Something a team can own.
///
/// Assets compare equal when either their ids or their names match, so a
/// request can reference an asset by whichever one the user knows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub kind: AssetKind,
    pub team_name: String,
}

impl Asset {
    pub fn player(
        id: impl Into<String>,
        name: impl Into<String>,
        position: impl Into<String>,
        value: f64,
        team_name: impl Into<String>,
    ) -> Result<Self> {
        let position = position.into().trim().to_uppercase();
        if position.is_empty() {
            return Self::pick(id, name, value, team_name);
        }
        Self::build(id.into(), name.into(), value, AssetKind::Player { position }, team_name.into())
    }

    pub fn pick(
        id: impl Into<String>,
        name: impl Into<String>,
        value: f64,
        team_name: impl Into<String>,
    ) -> Result<Self> {
        Self::build(id.into(), name.into(), value, AssetKind::Pick, team_name.into())
    }

    fn build(id: String, name: String, value: f64, kind: AssetKind, team_name: String) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(TradeError::InvalidParameter(format!(
                "asset `{}` has invalid value {}",
                name, value
            )));
        }
        Ok(Self { id, name, value, kind, team_name: team_name.trim().to_string() })
    }

    /// Position tag, `None` for picks.
    pub fn position(&self) -> Option<&str> {
        match &self.kind {
            AssetKind::Player { position } => Some(position.as_str()),
            AssetKind::Pick => None,
        }
    }

    pub fn is_pick(&self) -> bool {
        matches!(self.kind, AssetKind::Pick)
    }

    /// Whether this asset may fill a slot with the given eligibility set.
    pub fn eligible_for(&self, eligible: &EligibilitySet) -> bool {
        match &self.kind {
            AssetKind::Player { position } => eligible.contains(position),
            AssetKind::Pick => true,
        }
    }

    /// Strict position equality, used by the depth-chart pass.
    pub fn holds_position(&self, position: &str) -> bool {
        self.position() == Some(position)
    }

    /// Matches a user supplied reference by id or name.
    pub fn matches(&self, reference: &str) -> bool {
        self.id == reference || self.name == reference
    }

    pub fn same_asset(&self, other: &Asset) -> bool {
        self.id == other.id || self.name == other.name
    }
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.same_asset(other)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}, {}, Value: {:.2}",
            self.name,
            self.position().unwrap_or("PICK"),
            self.value
        )
    }
}
