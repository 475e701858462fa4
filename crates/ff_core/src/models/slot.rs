//! Slot categories, eligibility and lineup templates

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Result, TradeError};

pub const FLEX_LABEL: &str = "FLEX";
pub const SUPERFLEX_LABELS: [&str; 2] = ["SUPERFLEX", "SUPER"];
pub const QUARTERBACK: &str = "QB";

/// Base positions allowed to fill one slot category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligibilitySet(BTreeSet<String>);

impl EligibilitySet {
    pub fn new<I, S>(positions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(positions.into_iter().map(|p| p.as_ref().trim().to_uppercase()).collect())
    }

    pub fn contains(&self, position: &str) -> bool {
        self.0.contains(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Positions the generic categories accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub flex_positions: Vec<String>,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self { flex_positions: vec!["RB".into(), "WR".into(), "TE".into()] }
    }
}

impl EligibilityConfig {
    pub fn flex(&self) -> EligibilitySet {
        EligibilitySet::new(&self.flex_positions)
    }

    /// Flex positions plus the quarterback.
    pub fn superflex(&self) -> EligibilitySet {
        EligibilitySet::new(
            self.flex_positions.iter().map(String::as_str).chain(std::iter::once(QUARTERBACK)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotCategory {
    Position(String),
    Flex,
    /// Keeps the declared label (`SUPERFLEX` or `SUPER`) for slot naming.
    Superflex(String),
}

impl SlotCategory {
    pub fn parse(label: &str) -> Self {
        let label = label.trim().to_uppercase();
        if label == FLEX_LABEL {
            SlotCategory::Flex
        } else if SUPERFLEX_LABELS.contains(&label.as_str()) {
            SlotCategory::Superflex(label)
        } else {
            SlotCategory::Position(label)
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SlotCategory::Position(label) | SlotCategory::Superflex(label) => label,
            SlotCategory::Flex => FLEX_LABEL,
        }
    }

    /// Generic categories whose starters are handed back during the depth pass.
    pub fn is_special(&self) -> bool {
        !matches!(self, SlotCategory::Position(_))
    }

    pub fn eligibility(&self, config: &EligibilityConfig) -> EligibilitySet {
        match self {
            SlotCategory::Position(label) => EligibilitySet::new([label]),
            SlotCategory::Flex => config.flex(),
            SlotCategory::Superflex(_) => config.superflex(),
        }
    }
}

impl fmt::Display for SlotCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Concrete slot name: category label plus a 1-based index (`RB2`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub category: String,
    pub index: usize,
}

impl SlotKey {
    pub fn new(category: impl Into<String>, index: usize) -> Self {
        Self { category: category.into(), index }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.category, self.index)
    }
}

/// One slot of the flattened template with its resolved eligibility.
#[derive(Debug, Clone)]
pub struct TemplateSlot {
    pub category: SlotCategory,
    pub eligible: EligibilitySet,
}

/// Ordered category → count mapping plus the number of depth rounds.
///
/// Declaration order is significant: specific positions should come before
/// `FLEX`/`SUPERFLEX` so the generic slots do not starve them.
#[derive(Debug, Clone)]
pub struct SlotTemplate {
    categories: Vec<(SlotCategory, usize)>,
    depth: usize,
    eligibility: EligibilityConfig,
    flat: Vec<TemplateSlot>,
}

impl SlotTemplate {
    pub fn new<S: AsRef<str>>(entries: &[(S, usize)], depth: usize) -> Result<Self> {
        Self::with_eligibility(entries, depth, EligibilityConfig::default())
    }

    pub fn with_eligibility<S: AsRef<str>>(
        entries: &[(S, usize)],
        depth: usize,
        eligibility: EligibilityConfig,
    ) -> Result<Self> {
        if eligibility.flex_positions.iter().any(|p| p.trim().is_empty()) {
            return Err(TradeError::InvalidTemplate("flex positions cannot be blank".into()));
        }

        let mut categories: Vec<(SlotCategory, usize)> = Vec::with_capacity(entries.len());
        for (label, count) in entries {
            let label = label.as_ref();
            if label.trim().is_empty() {
                return Err(TradeError::InvalidTemplate("slot label cannot be empty".into()));
            }
            let category = SlotCategory::parse(label);
            if categories.iter().any(|(c, _)| c == &category) {
                return Err(TradeError::InvalidTemplate(format!(
                    "slot category `{}` declared twice",
                    category
                )));
            }
            if *count > 0 {
                categories.push((category, *count));
            }
        }

        let flat = categories
            .iter()
            .flat_map(|(category, count)| {
                let eligible = category.eligibility(&eligibility);
                std::iter::repeat_with(move || TemplateSlot {
                    category: category.clone(),
                    eligible: eligible.clone(),
                })
                .take(*count)
            })
            .collect();

        Ok(Self { categories, depth, eligibility, flat })
    }

    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
            depth: 0,
            eligibility: EligibilityConfig::default(),
            flat: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn categories(&self) -> &[(SlotCategory, usize)] {
        &self.categories
    }

    pub fn eligibility(&self) -> &EligibilityConfig {
        &self.eligibility
    }

    /// Starter slots in declaration order, one entry per required slot.
    pub fn flat_slots(&self) -> &[TemplateSlot] {
        &self.flat
    }

    pub fn starter_slot_count(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// Share of starter slots an asset could occupy (picks: all of them).
    pub fn fillable_fraction(&self, asset: &super::Asset) -> f64 {
        if self.flat.is_empty() {
            return 0.0;
        }
        let fillable = self.flat.iter().filter(|slot| asset.eligible_for(&slot.eligible)).count();
        fillable as f64 / self.flat.len() as f64
    }
}
