//! A two-team trade and its simulated outcome

use std::fmt;
use std::sync::Arc;
use tracing::trace;

use super::package::Package;
use crate::error::{Result, TradeError};
use crate::lineup::{RosterValuer, TeamValuation};
use crate::models::Team;

/// Both rosters valued before and after the exchange.
#[derive(Debug, Clone)]
pub struct TradeOutcome {
    pub new_team1: Arc<Team>,
    pub new_team2: Arc<Team>,
    pub before1: TeamValuation,
    pub before2: TeamValuation,
    pub after1: TeamValuation,
    pub after2: TeamValuation,
    pub team1_gain: f64,
    pub team2_gain: f64,
}

/// `team1` sends `package1` to `team2` and receives `package2`.
#[derive(Debug, Clone)]
pub struct Trade {
    team1: Arc<Team>,
    team2: Arc<Team>,
    package1: Package,
    package2: Package,
    outcome: Option<TradeOutcome>,
}

impl Trade {
    pub fn new(team1: Arc<Team>, team2: Arc<Team>, package1: Package, package2: Package) -> Self {
        Self { team1, team2, package1, package2, outcome: None }
    }

    pub fn team1(&self) -> &Arc<Team> {
        &self.team1
    }

    pub fn team2(&self) -> &Arc<Team> {
        &self.team2
    }

    pub fn sent(&self) -> &Package {
        &self.package1
    }

    pub fn received(&self) -> &Package {
        &self.package2
    }

    pub fn outcome(&self) -> Option<&TradeOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_executed(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn team1_gain(&self) -> Option<f64> {
        self.outcome.as_ref().map(|o| o.team1_gain)
    }

    pub fn team2_gain(&self) -> Option<f64> {
        self.outcome.as_ref().map(|o| o.team2_gain)
    }

    /// Both gains, or `NotExecuted`.
    pub fn gains(&self) -> Result<(f64, f64)> {
        self.outcome
            .as_ref()
            .map(|o| (o.team1_gain, o.team2_gain))
            .ok_or_else(|| TradeError::NotExecuted {
                team1: self.team1.name().to_string(),
                team2: self.team2.name().to_string(),
            })
    }

    /// Simulates the exchange and records the gains. Runs once per trade.
    pub fn execute(&mut self, valuer: &RosterValuer) -> Result<&TradeOutcome> {
        let before1 = valuer.evaluate(&self.team1);
        let before2 = valuer.evaluate(&self.team2);
        self.execute_from(valuer, &before1, &before2)
    }

    /// `execute` with the pre-trade valuations of both teams already known.
    pub fn execute_from(
        &mut self,
        valuer: &RosterValuer,
        before1: &TeamValuation,
        before2: &TeamValuation,
    ) -> Result<&TradeOutcome> {
        if self.outcome.is_some() {
            return Err(TradeError::AlreadyExecuted {
                team1: self.team1.name().to_string(),
                team2: self.team2.name().to_string(),
            });
        }

        let new_team1 = self.team1.exchange(self.package1.assets(), self.package2.assets())?;
        let new_team2 = self.team2.exchange(self.package2.assets(), self.package1.assets())?;

        let after1 = valuer.evaluate(&new_team1);
        let after2 = valuer.evaluate(&new_team2);
        let team1_gain = after1.value - before1.value;
        let team2_gain = after2.value - before2.value;
        trace!(
            team1 = self.team1.name(),
            team2 = self.team2.name(),
            sent = %self.package1,
            received = %self.package2,
            team1_gain,
            team2_gain,
            "trade executed"
        );

        Ok(&*self.outcome.insert(TradeOutcome {
            new_team1: Arc::new(new_team1),
            new_team2: Arc::new(new_team2),
            before1: before1.clone(),
            before2: before2.clone(),
            after1,
            after2,
            team1_gain,
            team2_gain,
        }))
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} sends {} to {} for {}",
            self.team1.name(),
            self.package1,
            self.team2.name(),
            self.package2
        )?;
        if let Some(outcome) = &self.outcome {
            write!(f, " ({:+.2} / {:+.2})", outcome.team1_gain, outcome.team2_gain)?;
        }
        Ok(())
    }
}
