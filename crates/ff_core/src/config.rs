//! League profiles and trade requests
//!
//! Both are plain serde types so callers can load them from YAML or JSON.
//! Request keys accept either `snake_case` or `kebab-case`, and list-valued
//! keys accept a single string as well.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{Result, TradeError};
use crate::league::{AssetRecord, League, TeamRef, TEAM_NAME_MATCH_CAP};
use crate::lineup::{RosterValuer, ValuationStrategy};
use crate::models::{EligibilityConfig, SlotTemplate};
use crate::trade::{
    ContainsPolicy, PackageCriteria, PackageFilter, RankOptions, ReceiveFilter, SendFilter, Trade,
    TradeFilters, TradeFinder, DEFAULT_MAX_ASSETS,
};

/// Request keys and what they do, in the order the CLI lists them.
pub const REQUEST_KEYS: &[(&str, &str)] = &[
    ("team", "Requesting team, by name (fuzzy) or index. Required."),
    ("max_fleece", "Drop trades whose two gains differ by this much or more."),
    ("min_gain", "Smallest gain for the requesting team. Defaults to 0; null disables."),
    ("pos", "Positions to send: a sent package must include one."),
    ("not_pos", "Positions that cannot be sent."),
    ("assets", "Assets to send (id or name)."),
    ("not_assets", "Assets that cannot be sent."),
    ("assets_exclusive", "Send every listed asset together instead of any one of them."),
    ("min_asset_value", "Minimum value of every asset sent and received."),
    ("max_assets", "Largest package on either side. Defaults to 2."),
    ("return_contains", "Assets the returned package must include."),
    ("return_contains_exclusive", "Require every `return_contains` asset instead of any."),
    ("assets_from_team", "Only trade with these teams."),
    ("assets_not_from_team", "Never trade with these teams."),
    ("target_pos", "Positions to receive: a returned package must include one (or a pick)."),
    ("not_receive_pos", "Positions that cannot be in the returned package."),
    ("receive_min_asset_value", "Minimum value of received assets, overriding `min_asset_value`."),
    ("return_does_not_contain", "Assets that cannot be received."),
    ("return_not_pos", "Positions that cannot be received."),
    ("exclude_picks", "Never receive draft picks."),
];

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// `"QB"`, `["QB", "RB"]` or `null`.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(item)) => vec![item],
        Some(OneOrMany::Many(items)) => items,
    })
}

fn default_min_gain() -> Option<f64> {
    Some(0.0)
}

fn default_max_assets() -> usize {
    DEFAULT_MAX_ASSETS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub team: TeamRef,
    #[serde(default, alias = "max-fleece")]
    pub max_fleece: Option<f64>,
    #[serde(default = "default_min_gain", alias = "min-gain")]
    pub min_gain: Option<f64>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub pos: Vec<String>,
    #[serde(default, alias = "not-pos", deserialize_with = "one_or_many")]
    pub not_pos: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub assets: Vec<String>,
    #[serde(default, alias = "not-assets", deserialize_with = "one_or_many")]
    pub not_assets: Vec<String>,
    #[serde(default, alias = "assets-exclusive")]
    pub assets_exclusive: bool,
    #[serde(default, alias = "min-asset-value")]
    pub min_asset_value: Option<f64>,

    #[serde(default = "default_max_assets", alias = "max-assets")]
    pub max_assets: usize,
    #[serde(default, alias = "return-contains", deserialize_with = "one_or_many")]
    pub return_contains: Vec<String>,
    #[serde(default, alias = "return-contains-exclusive")]
    pub return_contains_exclusive: bool,
    #[serde(default, alias = "assets-from-team", deserialize_with = "one_or_many")]
    pub assets_from_team: Vec<String>,
    #[serde(default, alias = "assets-not-from-team", deserialize_with = "one_or_many")]
    pub assets_not_from_team: Vec<String>,
    #[serde(default, alias = "target-pos", deserialize_with = "one_or_many")]
    pub target_pos: Vec<String>,
    #[serde(default, alias = "not-receive-pos", deserialize_with = "one_or_many")]
    pub not_receive_pos: Vec<String>,

    #[serde(default, alias = "receive-min-asset-value")]
    pub receive_min_asset_value: Option<f64>,
    #[serde(default, alias = "return-does-not-contain", deserialize_with = "one_or_many")]
    pub return_does_not_contain: Vec<String>,
    #[serde(default, alias = "return-not-pos", deserialize_with = "one_or_many")]
    pub return_not_pos: Vec<String>,
    #[serde(default, alias = "exclude-picks")]
    pub exclude_picks: bool,
}

fn positions(labels: &[String]) -> Vec<String> {
    labels.iter().map(|label| label.trim().to_uppercase()).collect()
}

fn check_number(name: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() => {
            Err(TradeError::InvalidParameter(format!("`{}` must be a finite number", name)))
        }
        _ => Ok(()),
    }
}

impl TradeRequest {
    /// Request with every filter off.
    pub fn new(team: impl Into<TeamRef>) -> Self {
        Self {
            team: team.into(),
            max_fleece: None,
            min_gain: default_min_gain(),
            pos: Vec::new(),
            not_pos: Vec::new(),
            assets: Vec::new(),
            not_assets: Vec::new(),
            assets_exclusive: false,
            min_asset_value: None,
            max_assets: DEFAULT_MAX_ASSETS,
            return_contains: Vec::new(),
            return_contains_exclusive: false,
            assets_from_team: Vec::new(),
            assets_not_from_team: Vec::new(),
            target_pos: Vec::new(),
            not_receive_pos: Vec::new(),
            receive_min_asset_value: None,
            return_does_not_contain: Vec::new(),
            return_not_pos: Vec::new(),
            exclude_picks: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.build_filters().map(|_| ())
    }

    pub fn build_filters(&self) -> Result<TradeFilters> {
        check_number("max_fleece", self.max_fleece)?;
        check_number("min_gain", self.min_gain)?;
        check_number("min_asset_value", self.min_asset_value)?;
        check_number("receive_min_asset_value", self.receive_min_asset_value)?;
        if self.max_fleece.is_some_and(|v| v < 0.0) {
            return Err(TradeError::InvalidParameter("`max_fleece` cannot be negative".into()));
        }

        let send = SendFilter {
            positions: positions(&self.pos),
            not_positions: positions(&self.not_pos),
            assets: self.assets.clone(),
            assets_policy: ContainsPolicy::exclusive(self.assets_exclusive),
            not_assets: self.not_assets.clone(),
            min_asset_value: self.min_asset_value,
        };

        let package = PackageFilter::new(PackageCriteria {
            max_assets: self.max_assets,
            return_contains: self.return_contains.clone(),
            return_contains_policy: ContainsPolicy::exclusive(self.return_contains_exclusive),
            assets_from_team: self.assets_from_team.clone(),
            assets_not_from_team: self.assets_not_from_team.clone(),
            target_positions: positions(&self.target_pos),
            not_receive_positions: positions(&self.not_receive_pos),
        })?;

        let receive = ReceiveFilter {
            min_asset_value: self.receive_min_asset_value.or(self.min_asset_value),
            return_does_not_contain: self.return_does_not_contain.clone(),
            return_not_positions: positions(&self.return_not_pos),
            exclude_picks: self.exclude_picks,
        };
        let receive = (receive != ReceiveFilter::default()).then_some(receive);

        Ok(TradeFilters { send, package, receive })
    }

    pub fn rank_options(&self) -> RankOptions {
        RankOptions { min_gain: self.min_gain, max_fleece: self.max_fleece, sort: true }
    }

    /// Runs the whole search against `league`.
    pub fn find_trades(&self, league: &League) -> Result<Vec<Trade>> {
        let filters = self.build_filters()?;
        TradeFinder::new(league).find(&self.team, &filters, &self.rank_options())
    }
}

/// Roster rules of a league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueProfile {
    #[serde(default)]
    pub platform: Option<String>,
    /// Slot categories in declaration order.
    #[serde(deserialize_with = "ordered_lineup", serialize_with = "serialize_lineup")]
    pub lineup: Vec<(String, usize)>,
    #[serde(default)]
    pub depth: usize,
    #[serde(default, alias = "flex-positions")]
    pub flex_positions: Option<Vec<String>>,
    #[serde(default)]
    pub valuation: ValuationStrategy,
    #[serde(default, alias = "name-match-threshold")]
    pub name_match_threshold: Option<f64>,
}

impl LeagueProfile {
    pub fn template(&self) -> Result<SlotTemplate> {
        let eligibility = match &self.flex_positions {
            Some(flex) => EligibilityConfig { flex_positions: positions(flex) },
            None => EligibilityConfig::default(),
        };
        SlotTemplate::with_eligibility(&self.lineup, self.depth, eligibility)
    }

    pub fn valuer(&self) -> Result<RosterValuer> {
        Ok(RosterValuer::new(self.template()?, self.valuation.clone()))
    }

    pub fn name_threshold(&self) -> Result<f64> {
        match self.name_match_threshold {
            None => Ok(TEAM_NAME_MATCH_CAP),
            Some(t) if (0.0..=1.0).contains(&t) => Ok(t),
            Some(t) => Err(TradeError::InvalidParameter(format!(
                "`name_match_threshold` must be within [0, 1], got {}",
                t
            ))),
        }
    }

    pub fn build_league(&self, records: &[AssetRecord]) -> Result<League> {
        let threshold = self.name_threshold()?;
        Ok(League::from_records(records, self.valuer()?)?.with_name_threshold(threshold))
    }

    /// Like `build_league`, reconciling record team names to `canonical_names`.
    pub fn build_league_with_names<S: AsRef<str>>(
        &self,
        records: &[AssetRecord],
        canonical_names: &[S],
    ) -> Result<League> {
        let threshold = self.name_threshold()?;
        Ok(League::from_records_with_names(records, canonical_names, self.valuer()?)?
            .with_name_threshold(threshold))
    }
}

struct LineupVisitor;

impl<'de> Visitor<'de> for LineupVisitor {
    type Value = Vec<(String, usize)>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of slot category to count")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((label, count)) = map.next_entry::<String, usize>()? {
            if entries.iter().any(|(existing, _): &(String, usize)| existing == &label) {
                return Err(de::Error::custom(format!("duplicate slot category `{}`", label)));
            }
            entries.push((label, count));
        }
        Ok(entries)
    }
}

fn ordered_lineup<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, usize)>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_map(LineupVisitor)
}

fn serialize_lineup<S>(lineup: &[(String, usize)], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(lineup.len()))?;
    for (label, count) in lineup {
        map.serialize_entry(label, count)?;
    }
    map.end()
}
