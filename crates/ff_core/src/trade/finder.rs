//! Trade search: package generation, filtering, execution and ranking

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::filter::{FilterPipeline, PackageFilter, ReceiveFilter, SendFilter};
use super::package::assemble;
use super::rank::{rank_and_filter, RankOptions};
use super::trade::Trade;
use crate::error::{Result, TradeError};
use crate::league::{League, TeamRef};
use crate::lineup::TeamValuation;
use crate::models::Team;

/// The three filters of one search. `receive` is `None` when nothing is
/// asked of the returned packages.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeFilters {
    pub send: SendFilter,
    pub package: PackageFilter,
    pub receive: Option<ReceiveFilter>,
}

impl TradeFilters {
    /// Applied to the requesting team's packages.
    pub fn send_pipeline(&self) -> FilterPipeline {
        FilterPipeline::new().with(self.send.clone())
    }

    /// Applied to each opponent's packages: package filter, then receive filter.
    pub fn receive_pipeline(&self) -> FilterPipeline {
        FilterPipeline::new().with(self.package.clone()).with(self.receive.clone())
    }
}

pub struct TradeFinder<'a> {
    league: &'a League,
}

impl<'a> TradeFinder<'a> {
    pub fn new(league: &'a League) -> Self {
        Self { league }
    }

    /// Full search for `team`: assemble, execute, rank.
    pub fn find(&self, team: &TeamRef, filters: &TradeFilters, rank: &RankOptions) -> Result<Vec<Trade>> {
        let team = self.league.team(team)?;
        info!(team = team.name(), "searching trades");
        let mut trades = self.assemble_trades(team, filters)?;
        self.execute_all(&mut trades)?;
        rank_and_filter(trades, rank)
    }

    /// Every unexecuted trade between `team` and an eligible opponent that
    /// passes the filters, opponent by opponent in league order.
    pub fn assemble_trades(&self, team: &Arc<Team>, filters: &TradeFilters) -> Result<Vec<Trade>> {
        let max_assets = filters.package.max_assets();

        let send_packages = filters.send_pipeline().apply(assemble(team.assets(), max_assets));
        if send_packages.is_empty() {
            return Err(TradeError::NoSendPackages);
        }
        debug!(count = send_packages.len(), "send packages");

        let opponents: Vec<&Arc<Team>> = filters
            .package
            .matching_teams(self.league)?
            .into_iter()
            .filter(|opp| opp.name() != team.name())
            .collect();
        if opponents.is_empty() {
            return Err(TradeError::NoOpposingTeams);
        }

        let receive_pipeline = filters.receive_pipeline();
        let per_opponent: Vec<Vec<Trade>> = opponents
            .par_iter()
            .map(|opp| {
                let receive = receive_pipeline.apply(assemble(opp.assets(), max_assets));
                debug!(opponent = opp.name(), packages = receive.len(), "building trades");
                send_packages
                    .iter()
                    .flat_map(|sent| {
                        receive.iter().map(move |received| {
                            Trade::new(
                                Arc::clone(team),
                                Arc::clone(opp),
                                sent.clone(),
                                received.clone(),
                            )
                        })
                    })
                    .collect()
            })
            .collect();

        let trades: Vec<Trade> = per_opponent.into_iter().flatten().collect();
        if trades.is_empty() {
            return Err(TradeError::NoCandidateTrades);
        }
        info!(count = trades.len(), opponents = opponents.len(), "assembled trades");
        Ok(trades)
    }

    /// Executes every trade, valuing each pre-trade roster once.
    pub fn execute_all(&self, trades: &mut [Trade]) -> Result<()> {
        let valuer = self.league.valuer();

        // Owned, so the map does not borrow `trades`.
        let mut teams: Vec<Arc<Team>> = Vec::new();
        for trade in trades.iter() {
            for team in [trade.team1(), trade.team2()] {
                if !teams.iter().any(|known| known.name() == team.name()) {
                    teams.push(Arc::clone(team));
                }
            }
        }
        let before: FxHashMap<String, TeamValuation> = teams
            .par_iter()
            .map(|team| (team.name().to_string(), valuer.evaluate(team)))
            .collect();
        debug!(teams = before.len(), "pre-trade valuations");

        trades.par_iter_mut().try_for_each(|trade| {
            let known = (before.get(trade.team1().name()), before.get(trade.team2().name()));
            match known {
                (Some(before1), Some(before2)) => {
                    trade.execute_from(valuer, before1, before2).map(|_| ())
                }
                _ => trade.execute(valuer).map(|_| ()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::AssetRecord;
    use crate::lineup::{RosterValuer, ValuationStrategy};
    use crate::models::SlotTemplate;
    use crate::trade::filter::PackageCriteria;

    fn league() -> League {
        let records = vec![
            AssetRecord::new("1", "qb-1", Some("QB"), 5.0, "team1"),
            AssetRecord::new("2", "rb-1", Some("RB"), 2.0, "team1"),
            AssetRecord::new("3", "qb-2", Some("QB"), 6.0, "team2"),
            AssetRecord::new("4", "rb-3", Some("RB"), 4.0, "team3"),
        ];
        let valuer = RosterValuer::new(
            SlotTemplate::new(&[("QB", 1), ("RB", 1)], 0).unwrap(),
            ValuationStrategy::DepthChart,
        );
        League::from_records(&records, valuer).unwrap()
    }

    fn filters() -> TradeFilters {
        TradeFilters {
            send: SendFilter::default(),
            package: PackageFilter::new(PackageCriteria::default()).unwrap(),
            receive: None,
        }
    }

    #[test]
    fn test_assemble_counts() {
        let league = league();
        let finder = TradeFinder::new(&league);
        let team = league.team(&"team1".into()).unwrap();
        let trades = finder.assemble_trades(team, &filters()).unwrap();
        // 3 send packages; team2 and team3 offer one package each.
        assert_eq!(trades.len(), 6);
        assert_eq!(trades[0].team2().name(), "team2");
        assert_eq!(trades[5].team2().name(), "team3");
        assert!(trades.iter().all(|t| !t.is_executed()));
    }

    #[test]
    fn test_empty_stages() {
        let league = league();
        let finder = TradeFinder::new(&league);
        let team = league.team(&"team1".into()).unwrap();

        let mut no_send = filters();
        no_send.send.min_asset_value = Some(10.0);
        assert_eq!(finder.assemble_trades(team, &no_send).unwrap_err(), TradeError::NoSendPackages);

        let mut only_self = filters();
        only_self.package = PackageFilter::new(PackageCriteria {
            assets_from_team: vec!["team1".into()],
            ..Default::default()
        })
        .unwrap();
        assert_eq!(finder.assemble_trades(team, &only_self).unwrap_err(), TradeError::NoOpposingTeams);

        let mut nothing_back = filters();
        nothing_back.receive = Some(ReceiveFilter {
            exclude_picks: true,
            min_asset_value: Some(100.0),
            ..Default::default()
        });
        assert_eq!(
            finder.assemble_trades(team, &nothing_back).unwrap_err(),
            TradeError::NoCandidateTrades
        );
    }

    #[test]
    fn test_find_ranks_executed_trades() {
        let league = league();
        let finder = TradeFinder::new(&league);
        let trades = finder.find(&"team1".into(), &filters(), &RankOptions::default()).unwrap();
        assert!(trades.iter().all(|t| t.is_executed()));
        let gains: Vec<f64> = trades.iter().filter_map(|t| t.team1_gain()).collect();
        assert!(gains.windows(2).all(|w| w[0] >= w[1]));
        assert!(gains.iter().all(|g| *g >= 0.0));
        // rb-1 for rb-3 lifts team1 from 7 to 9; qb-1 for qb-2 from 7 to 8.
        assert_eq!(gains, vec![2.0, 1.0]);
        assert_eq!(trades[0].sent().to_string(), "[rb-1]");
        assert_eq!(trades[0].received().to_string(), "[rb-3]");
        assert_eq!(trades[1].received().to_string(), "[qb-2]");
    }

    #[test]
    fn test_receive_pipeline_runs_package_then_receive() {
        let mut with_receive = filters();
        assert_eq!(with_receive.receive_pipeline().len(), 2);
        assert_eq!(with_receive.send_pipeline().len(), 1);

        let league = league();
        let finder = TradeFinder::new(&league);
        let team = league.team(&"team1".into()).unwrap();
        with_receive.receive =
            Some(ReceiveFilter { return_not_positions: vec!["QB".into()], ..Default::default() });
        let trades = finder.assemble_trades(team, &with_receive).unwrap();
        // Only team3's running back remains on the other side.
        assert_eq!(trades.len(), 3);
        assert!(trades.iter().all(|t| t.received().to_string() == "[rb-3]"));
    }

    #[test]
    fn test_execute_all_matches_single_execution() {
        let league = league();
        let finder = TradeFinder::new(&league);
        let team = league.team(&"team1".into()).unwrap();
        let mut batch = finder.assemble_trades(team, &filters()).unwrap();
        let mut single = batch.clone();
        finder.execute_all(&mut batch).unwrap();
        for trade in &mut single {
            trade.execute(league.valuer()).unwrap();
        }
        let gains = |trades: &[Trade]| -> Vec<(f64, f64)> {
            trades.iter().map(|t| t.gains().unwrap()).collect()
        };
        assert_eq!(gains(&batch), gains(&single));
        assert!(batch.iter().all(|t| t.outcome().unwrap().before1.value == 7.0));
    }
}
