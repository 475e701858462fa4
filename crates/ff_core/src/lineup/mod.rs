//! Lineups: slot assignment and the values derived from it
//!
//! A `Lineup` is produced by the `SlotAssigner` and carries its starter and
//! total values from construction. Revaluing a roster means assigning a new
//! lineup; the stored values are never recomputed.

pub mod assigner;
pub mod valuation;

pub use assigner::SlotAssigner;
pub use valuation::{RosterValuer, TeamValuation, ValuationStrategy};

use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, TradeError};
use crate::models::{Asset, SlotKey};

#[derive(Debug, Clone)]
pub struct Lineup {
    slots: Vec<(SlotKey, Option<Arc<Asset>>)>,
    starter_count: usize,
    starter_value: OnceCell<f64>,
    total_value: OnceCell<f64>,
}

impl Lineup {
    pub fn empty() -> Self {
        LineupBuilder::default().finish()
    }

    pub fn starter_value(&self) -> f64 {
        self.starter_value.get().copied().unwrap_or(0.0)
    }

    pub fn total_value(&self) -> f64 {
        self.total_value.get().copied().unwrap_or(0.0)
    }

    /// Always fails once the lineup is built: the value is fixed at construction.
    pub fn set_starter_value(&self, value: f64) -> Result<()> {
        self.starter_value.set(value).map_err(|_| TradeError::ValueAlreadySet("starter_value"))
    }

    pub fn set_total_value(&self, value: f64) -> Result<()> {
        self.total_value.set(value).map_err(|_| TradeError::ValueAlreadySet("total_value"))
    }

    /// Keys filled by the starter pass, in template order.
    pub fn starter_keys(&self) -> impl Iterator<Item = &SlotKey> {
        self.slots[..self.starter_count].iter().map(|(key, _)| key)
    }

    pub fn is_starter(&self, key: &SlotKey) -> bool {
        self.starter_keys().any(|k| k == key)
    }

    pub fn slots(&self) -> &[(SlotKey, Option<Arc<Asset>>)] {
        &self.slots
    }

    pub fn starters(&self) -> &[(SlotKey, Option<Arc<Asset>>)] {
        &self.slots[..self.starter_count]
    }

    pub fn depth_chart(&self) -> &[(SlotKey, Option<Arc<Asset>>)] {
        &self.slots[self.starter_count..]
    }

    /// Asset in a slot by its display name (`"RB2"`).
    pub fn get(&self, slot: &str) -> Option<&Arc<Asset>> {
        self.slots
            .iter()
            .find(|(key, _)| key.to_string() == slot)
            .and_then(|(_, asset)| asset.as_ref())
    }

    pub fn get_slot(&self, key: &SlotKey) -> Option<&Arc<Asset>> {
        self.slots.iter().find(|(k, _)| k == key).and_then(|(_, asset)| asset.as_ref())
    }

    pub fn contains_key(&self, slot: &str) -> bool {
        self.slots.iter().any(|(key, _)| key.to_string() == slot)
    }

    /// Whether the asset occupies any slot, starter or depth.
    pub fn contains_asset(&self, asset: &Asset) -> bool {
        self.filled().any(|a| a.same_asset(asset))
    }

    pub fn filled(&self) -> impl Iterator<Item = &Arc<Asset>> {
        self.slots.iter().filter_map(|(_, asset)| asset.as_ref())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Display for Lineup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (key, asset)) in self.slots.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match asset {
                Some(asset) => write!(f, "{}: {}", key, asset)?,
                None => write!(f, "{}: -", key)?,
            }
        }
        Ok(())
    }
}

/// Accumulates slots while the assigner runs.
#[derive(Debug, Default)]
pub(crate) struct LineupBuilder {
    slots: Vec<(SlotKey, Option<Arc<Asset>>)>,
    starter_count: Option<usize>,
}

impl LineupBuilder {
    /// Appends a slot numbered after the existing slots of the same category.
    pub(crate) fn push(&mut self, category: &str, asset: Option<Arc<Asset>>) -> SlotKey {
        let index = self
            .slots
            .iter()
            .filter(|(key, _)| key.category == category)
            .map(|(key, _)| key.index)
            .max()
            .unwrap_or(0)
            + 1;
        let key = SlotKey::new(category, index);
        self.slots.push((key.clone(), asset));
        key
    }

    /// Freezes the current slots as the starter set. Later calls are ignored.
    pub(crate) fn seal_starters(&mut self) {
        if self.starter_count.is_none() {
            self.starter_count = Some(self.slots.len());
        }
    }

    fn filled_value(slots: &[(SlotKey, Option<Arc<Asset>>)]) -> f64 {
        slots.iter().filter_map(|(_, asset)| asset.as_ref()).map(|asset| asset.value).sum()
    }

    pub(crate) fn finish(self) -> Lineup {
        let starter_count = self.starter_count.unwrap_or(self.slots.len());
        let starter_value = Self::filled_value(&self.slots[..starter_count]);
        let total_value = Self::filled_value(&self.slots);
        Lineup {
            slots: self.slots,
            starter_count,
            starter_value: OnceCell::with_value(starter_value),
            total_value: OnceCell::with_value(total_value),
        }
    }
}
