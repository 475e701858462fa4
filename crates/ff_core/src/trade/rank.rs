//! Gain thresholds and ordering for executed trades

use serde::{Deserialize, Serialize};
use tracing::info;

use super::trade::Trade;
use crate::error::{Result, TradeError};

fn default_min_gain() -> Option<f64> {
    Some(0.0)
}

fn default_sort() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankOptions {
    /// Smallest acceptable gain for the requesting team.
    #[serde(default = "default_min_gain")]
    pub min_gain: Option<f64>,
    /// Trades whose gains differ by this much or more are dropped.
    #[serde(default)]
    pub max_fleece: Option<f64>,
    #[serde(default = "default_sort")]
    pub sort: bool,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self { min_gain: default_min_gain(), max_fleece: None, sort: true }
    }
}

/// Keeps trades clearing the thresholds, best gain for team1 first.
///
/// Ties keep their input order.
pub fn rank_and_filter(trades: Vec<Trade>, options: &RankOptions) -> Result<Vec<Trade>> {
    let mut scored = Vec::with_capacity(trades.len());
    for trade in trades {
        let gains = trade.gains()?;
        scored.push((gains, trade));
    }

    scored.retain(|((gain1, gain2), _)| {
        options.min_gain.map_or(true, |min| *gain1 >= min)
            && options.max_fleece.map_or(true, |max| (gain1 - gain2).abs() < max)
    });

    if options.sort {
        scored.sort_by(|((a, _), _), ((b, _), _)| b.total_cmp(a));
    }

    info!(count = scored.len(), "located trades");
    if scored.is_empty() {
        return Err(TradeError::NoTradesCleared);
    }
    Ok(scored.into_iter().map(|(_, trade)| trade).collect())
}
