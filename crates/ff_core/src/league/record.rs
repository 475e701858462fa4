//! Normalized asset records supplied by the ingestion layer

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::models::Asset;

/// One row of league ownership data.
///
/// `pos` is `null` (or blank) for draft picks. Records with no value are
/// dropped when the league is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "position")]
    pub pos: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    pub team: String,
}

impl AssetRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        pos: Option<&str>,
        value: f64,
        team: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pos: pos.map(str::to_string),
            value: Some(value),
            team: team.into(),
        }
    }

    /// Builds the asset under `team_name`; `Ok(None)` when the record has no value.
    pub fn to_asset(&self, team_name: &str) -> Result<Option<Asset>> {
        let Some(value) = self.value else {
            return Ok(None);
        };
        let asset = match self.pos.as_deref().map(str::trim) {
            Some(pos) if !pos.is_empty() => {
                Asset::player(self.id.clone(), self.name.clone(), pos, value, team_name)?
            }
            _ => Asset::pick(self.id.clone(), self.name.clone(), value, team_name)?,
        };
        Ok(Some(asset))
    }
}

/// Platform ids arrive as strings from some APIs and integers from others.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    })
}
