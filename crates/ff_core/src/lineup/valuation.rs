//! Team valuation strategies
//!
//! `DepthChart` values a roster by its lineup total (starters plus depth
//! slots). `BenchWeighted` adds the best bench assets, ranked by how many
//! starter slots their position could fill.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{Lineup, SlotAssigner};
use crate::models::{Asset, SlotTemplate, Team};

pub const DEFAULT_BENCH_WINDOW: usize = 2;

fn default_window() -> usize {
    DEFAULT_BENCH_WINDOW
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ValuationStrategy {
    #[default]
    DepthChart,
    BenchWeighted {
        #[serde(default = "default_window")]
        window: usize,
    },
}

impl ValuationStrategy {
    pub fn bench_weighted() -> Self {
        ValuationStrategy::BenchWeighted { window: DEFAULT_BENCH_WINDOW }
    }

    pub fn value(&self, lineup: &Lineup, bench: &[Arc<Asset>]) -> f64 {
        match self {
            ValuationStrategy::DepthChart => lineup.total_value(),
            ValuationStrategy::BenchWeighted { window } => {
                lineup.total_value()
                    + bench.iter().take(*window).map(|asset| asset.value).sum::<f64>()
            }
        }
    }
}

/// Assets outside the lineup, most likely to enter it first.
///
/// Raw value order first, then a stable re-rank by value weighted with the
/// share of starter slots the asset's position can fill.
pub fn rank_bench(lineup: &Lineup, assets: &[Arc<Asset>], template: &SlotTemplate) -> Vec<Arc<Asset>> {
    let mut bench: Vec<Arc<Asset>> =
        assets.iter().filter(|asset| !lineup.contains_asset(asset)).cloned().collect();
    bench.sort_by(|a, b| b.value.total_cmp(&a.value));

    let mut weighted: Vec<(f64, Arc<Asset>)> = bench
        .into_iter()
        .map(|asset| (asset.value * template.fillable_fraction(&asset), asset))
        .collect();
    weighted.sort_by(|a, b| b.0.total_cmp(&a.0));
    weighted.into_iter().map(|(_, asset)| asset).collect()
}

/// A team's lineup under one assigner, and the value the strategy gives it.
#[derive(Debug, Clone)]
pub struct TeamValuation {
    pub lineup: Lineup,
    pub bench: Vec<Arc<Asset>>,
    pub value: f64,
}

/// Lineup assignment plus valuation strategy, passed explicitly to the
/// league and to trade evaluation.
#[derive(Debug, Clone)]
pub struct RosterValuer {
    assigner: SlotAssigner,
    strategy: ValuationStrategy,
}

impl RosterValuer {
    pub fn new(template: SlotTemplate, strategy: ValuationStrategy) -> Self {
        Self { assigner: SlotAssigner::new(template), strategy }
    }

    pub fn assigner(&self) -> &SlotAssigner {
        &self.assigner
    }

    pub fn strategy(&self) -> &ValuationStrategy {
        &self.strategy
    }

    pub fn lineup(&self, team: &Team) -> Lineup {
        self.assigner.assign(team.assets())
    }

    pub fn evaluate(&self, team: &Team) -> TeamValuation {
        self.evaluate_assets(team.assets())
    }

    pub fn evaluate_assets(&self, assets: &[Arc<Asset>]) -> TeamValuation {
        let lineup = self.assigner.assign(assets);
        let bench = rank_bench(&lineup, assets, self.assigner.template());
        let value = self.strategy.value(&lineup, &bench);
        TeamValuation { lineup, bench, value }
    }
}
