//! SlotAssigner: greedy lineup construction with an optional depth chart
//!
//! Starter pass: walk the template slots in declaration order and give each
//! one the highest-value remaining asset eligible for it.
//! Depth pass: hand flex/superflex starters back to the pool, then refill the
//! specific categories `depth` more times by exact position, and the generic
//! categories `depth` times from the full roster.

use std::sync::Arc;
use tracing::{debug, trace};

use super::{Lineup, LineupBuilder};
use crate::models::{Asset, SlotCategory, SlotTemplate, TemplateSlot};

#[derive(Debug, Clone)]
pub struct SlotAssigner {
    template: SlotTemplate,
}

impl SlotAssigner {
    pub fn new(template: SlotTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &SlotTemplate {
        &self.template
    }

    pub fn assign(&self, assets: &[Arc<Asset>]) -> Lineup {
        // Stable: equal values keep roster order.
        let mut ranked: Vec<Arc<Asset>> = assets.to_vec();
        ranked.sort_by(|a, b| b.value.total_cmp(&a.value));

        // Pool entries are indices into `ranked`, so sorting the pool restores
        // value order with roster-order tie-breaking.
        let mut pool: Vec<usize> = (0..ranked.len()).collect();
        let mut builder = LineupBuilder::default();
        let mut returned: Vec<usize> = Vec::new();

        for slot in self.template.flat_slots() {
            let chosen = pool
                .iter()
                .position(|&rank| ranked[rank].eligible_for(&slot.eligible))
                .map(|i| pool.remove(i));

            if let (Some(rank), true) = (chosen, slot.category.is_special()) {
                returned.push(rank);
            }
            builder.push(slot.category.label(), chosen.map(|rank| Arc::clone(&ranked[rank])));
        }
        builder.seal_starters();

        let depth = self.template.depth();
        if depth > 0 {
            // Flex starters are still real roster assets at their own position.
            pool.extend(returned);
            pool.sort_unstable();

            let regular: Vec<&TemplateSlot> = self
                .template
                .flat_slots()
                .iter()
                .filter(|slot| !slot.category.is_special())
                .collect();

            for round in 0..depth {
                for slot in &regular {
                    let label = slot.category.label();
                    trace!(round, slot = label, "filling depth slot");
                    if let Some(i) = pool.iter().position(|&rank| ranked[rank].holds_position(label)) {
                        let rank = pool.remove(i);
                        let key = builder.push(label, Some(Arc::clone(&ranked[rank])));
                        trace!(%key, asset = %ranked[rank].name, "filled depth slot");
                    }
                }
            }

            let specials: Vec<&SlotCategory> = self
                .template
                .categories()
                .iter()
                .map(|(category, _)| category)
                .filter(|category| category.is_special())
                .collect();

            let mut full_pool: Vec<usize> = (0..ranked.len()).collect();
            for round in 0..depth {
                for category in &specials {
                    let label = category.label();
                    trace!(round, slot = label, "filling depth slot");
                    if let Some(i) =
                        full_pool.iter().position(|&rank| ranked[rank].holds_position(label))
                    {
                        let rank = full_pool.remove(i);
                        let key = builder.push(label, Some(Arc::clone(&ranked[rank])));
                        trace!(%key, asset = %ranked[rank].name, "filled depth slot");
                    }
                }
            }
        }

        let lineup = builder.finish();
        debug!(
            assets = assets.len(),
            slots = lineup.len(),
            starter_value = lineup.starter_value(),
            total_value = lineup.total_value(),
            "lineup assigned"
        );
        lineup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, pos: &str, value: f64) -> Arc<Asset> {
        Arc::new(Asset::player(name, name, pos, value, "team1").unwrap())
    }

    fn assigner(entries: &[(&str, usize)], depth: usize) -> SlotAssigner {
        SlotAssigner::new(SlotTemplate::new(entries, depth).unwrap())
    }

    fn name_at<'a>(lineup: &'a Lineup, slot: &str) -> Option<&'a str> {
        lineup.get(slot).map(|a| a.name.as_str())
    }

    #[test]
    fn test_lineup_no_depth() {
        let lineup = assigner(&[("RB", 1)], 0)
            .assign(&[named("player1", "RB", 100.0), named("player2", "RB", 50.0)]);
        assert_eq!(name_at(&lineup, "RB1"), Some("player1"));
        assert_eq!(lineup.len(), 1);
        assert_eq!(lineup.starter_value(), 100.0);
        assert_eq!(lineup.total_value(), 100.0);
    }

    #[test]
    fn test_lineup_depth_counts_bench_rounds() {
        let lineup = assigner(&[("RB", 1)], 2).assign(&[
            named("player1", "RB", 100.0),
            named("player2", "RB", 50.0),
            named("player3", "RB", 25.0),
        ]);
        assert_eq!(name_at(&lineup, "RB1"), Some("player1"));
        assert_eq!(name_at(&lineup, "RB2"), Some("player2"));
        assert_eq!(name_at(&lineup, "RB3"), Some("player3"));
        assert_eq!(lineup.starter_value(), 100.0);
        assert_eq!(lineup.total_value(), 175.0);
    }

    #[test]
    fn test_lineup_depth_stops_when_pool_runs_out() {
        let lineup = assigner(&[("RB", 1)], 2)
            .assign(&[named("player1", "RB", 100.0), named("player2", "RB", 50.0)]);
        assert_eq!(name_at(&lineup, "RB2"), Some("player2"));
        assert!(!lineup.contains_key("RB3"));
        assert_eq!(lineup.total_value(), 150.0);
    }

    #[test]
    fn test_lineup_flex() {
        let lineup = assigner(&[("RB", 1), ("FLEX", 1)], 0)
            .assign(&[named("player1", "RB", 100.0), named("player2", "RB", 50.0)]);
        assert_eq!(name_at(&lineup, "RB1"), Some("player1"));
        assert_eq!(name_at(&lineup, "FLEX1"), Some("player2"));
        assert_eq!(lineup.starter_value(), 150.0);
        assert_eq!(lineup.total_value(), 150.0);
    }

    #[test]
    fn test_lineup_backup() {
        let lineup = assigner(&[("RB", 2)], 0)
            .assign(&[named("player1", "RB", 100.0), named("player2", "RB", 50.0)]);
        assert_eq!(name_at(&lineup, "RB1"), Some("player1"));
        assert_eq!(name_at(&lineup, "RB2"), Some("player2"));
        assert_eq!(lineup.starter_value(), 150.0);
    }

    #[test]
    fn test_lineup_depth_flex_counts_flex_starter_again() {
        let lineup = assigner(&[("RB", 1), ("FLEX", 1)], 1).assign(&[
            named("player1", "RB", 100.0),
            named("player2", "RB", 50.0),
            named("player3", "WR", 50.0),
        ]);
        assert_eq!(name_at(&lineup, "RB1"), Some("player1"));
        // Equal values: roster order decides.
        assert_eq!(name_at(&lineup, "FLEX1"), Some("player2"));
        assert_eq!(name_at(&lineup, "RB2"), Some("player2"));
        assert_eq!(lineup.starter_value(), 150.0);
        assert_eq!(lineup.total_value(), 200.0);
    }

    #[test]
    fn test_returned_flex_starter_rejoins_pool_by_value() {
        let lineup = assigner(&[("RB", 1), ("FLEX", 1)], 1).assign(&[
            named("rb100", "RB", 100.0),
            named("rb50", "RB", 50.0),
            named("rb30", "RB", 30.0),
        ]);
        assert_eq!(name_at(&lineup, "FLEX1"), Some("rb50"));
        // The flex starter outranks rb30 for the backup slot.
        assert_eq!(name_at(&lineup, "RB2"), Some("rb50"));
        assert!(!lineup.contains_key("RB3"));
        assert_eq!(lineup.starter_value(), 150.0);
        assert_eq!(lineup.total_value(), 200.0);
    }

    #[test]
    fn test_lineup_flex_complex_no_depth() {
        let lineup = assigner(
            &[("QB", 1), ("RB", 2), ("WR", 1), ("TE", 1), ("FLEX", 1)],
            0,
        )
        .assign(&[
            named("player1", "RB", 100.0),
            named("player2", "RB", 75.0),
            named("player5", "RB", 50.0),
            named("player3", "QB", 100.0),
            named("player4", "TE", 50.0),
            named("player8", "TE", 25.0),
            named("player6", "WR", 150.0),
            named("player7", "WR", 75.0),
        ]);
        assert_eq!(name_at(&lineup, "QB1"), Some("player3"));
        assert_eq!(name_at(&lineup, "RB1"), Some("player1"));
        assert_eq!(name_at(&lineup, "RB2"), Some("player2"));
        assert_eq!(name_at(&lineup, "WR1"), Some("player6"));
        assert_eq!(name_at(&lineup, "TE1"), Some("player4"));
        assert_eq!(name_at(&lineup, "FLEX1"), Some("player7"));
        assert_eq!(lineup.starter_value(), 550.0);
        assert_eq!(lineup.total_value(), 550.0);
    }

    #[test]
    fn test_lineup_flex_complex_depth() {
        let lineup = assigner(
            &[("QB", 1), ("RB", 2), ("WR", 1), ("TE", 1), ("FLEX", 1), ("SUPER", 1)],
            1,
        )
        .assign(&[
            named("player3", "QB", 100.0),
            named("player9", "QB", 75.0),
            named("player1", "RB", 100.0),
            named("player2", "RB", 75.0),
            named("player5", "RB", 50.0),
            named("player4", "TE", 50.0),
            named("player8", "TE", 25.0),
            named("player6", "WR", 150.0),
            named("player7", "WR", 70.0),
            named("player10", "WR", 50.0),
            named("player11", "RB", 25.0),
        ]);
        assert_eq!(name_at(&lineup, "QB1"), Some("player3"));
        assert_eq!(name_at(&lineup, "RB1"), Some("player1"));
        assert_eq!(name_at(&lineup, "RB2"), Some("player2"));
        assert_eq!(name_at(&lineup, "WR1"), Some("player6"));
        assert_eq!(name_at(&lineup, "TE1"), Some("player4"));
        assert_eq!(name_at(&lineup, "FLEX1"), Some("player7"));
        assert_eq!(name_at(&lineup, "SUPER1"), Some("player9"));
        // The superflex QB is also the backup QB on the depth chart.
        assert_eq!(name_at(&lineup, "QB2"), Some("player9"));
        assert_eq!(name_at(&lineup, "RB3"), Some("player5"));
        assert_eq!(name_at(&lineup, "RB4"), Some("player11"));
        assert_eq!(name_at(&lineup, "WR2"), Some("player7"));
        assert_eq!(name_at(&lineup, "TE2"), Some("player8"));
        assert_eq!(lineup.starter_value(), 620.0);
    }

    #[test]
    fn test_empty_template() {
        let lineup = SlotAssigner::new(SlotTemplate::empty()).assign(&[named("a", "QB", 9.0)]);
        assert!(lineup.is_empty());
        assert_eq!(lineup.starter_value(), 0.0);
        assert_eq!(lineup.total_value(), 0.0);
    }

    #[test]
    fn test_unfillable_slots_stay_empty() {
        let lineup = assigner(&[("QB", 1), ("TE", 2)], 0).assign(&[named("a", "TE", 9.0)]);
        assert_eq!(lineup.len(), 3);
        assert!(lineup.get("QB1").is_none());
        assert_eq!(name_at(&lineup, "TE1"), Some("a"));
        assert!(lineup.get("TE2").is_none());
        assert_eq!(lineup.starter_value(), 9.0);
    }

    #[test]
    fn test_pick_fills_any_starter_slot_but_not_depth() {
        let pick = Arc::new(Asset::pick("p1", "2026 1st", 80.0, "team1").unwrap());
        let lineup = assigner(&[("QB", 1), ("RB", 1)], 1)
            .assign(&[pick, named("back", "RB", 10.0), named("back2", "RB", 5.0)]);
        assert_eq!(name_at(&lineup, "QB1"), Some("2026 1st"));
        assert_eq!(name_at(&lineup, "RB1"), Some("back"));
        assert_eq!(name_at(&lineup, "RB2"), Some("back2"));
        assert!(!lineup.contains_key("QB2"));
        assert_eq!(lineup.total_value(), 95.0);
    }

    #[test]
    fn test_generic_depth_uses_exact_label() {
        // Only an asset tagged with the category label itself fills a
        // generic depth slot.
        let lineup = assigner(&[("FLEX", 1)], 1)
            .assign(&[named("a", "RB", 20.0), named("b", "FLEX", 10.0)]);
        assert_eq!(name_at(&lineup, "FLEX1"), Some("a"));
        assert_eq!(name_at(&lineup, "FLEX2"), Some("b"));
        assert_eq!(lineup.total_value(), 30.0);
    }
}
