//! Plain-text trade reports

use std::fmt::Write as _;
use std::sync::Arc;

use ff_core::{Asset, Lineup, Package, Trade, TradeOutcome};

/// Bench assets listed under each post-trade lineup.
pub const BENCH_SHOWN: usize = 2;

const RULE: &str = "== Trade ================================================================";

fn assets_line(package: &Package) -> String {
    let items: Vec<String> = package.iter().map(|asset| format!("({})", asset)).collect();
    items.join(", ")
}

fn bench_lines(out: &mut String, bench: &[Arc<Asset>]) {
    if bench.is_empty() {
        out.push_str("  -\n");
        return;
    }
    for asset in bench.iter().take(BENCH_SHOWN) {
        let _ = writeln!(out, "  {}", asset);
    }
}

fn lineup_lines(out: &mut String, lineup: &Lineup) {
    for line in lineup.to_string().lines() {
        let _ = writeln!(out, "  {}", line);
    }
}

fn outcome_block(out: &mut String, outcome: &TradeOutcome) {
    for (label, after) in [("Team1", &outcome.after1), ("Team2", &outcome.after2)] {
        let _ = writeln!(out, "{} Lineup:", label);
        lineup_lines(out, &after.lineup);
        let _ = writeln!(out, "{} Bench:", label);
        bench_lines(out, &after.bench);
    }
    let _ = writeln!(out, "Team1 Gain: {:.2}", outcome.team1_gain);
    let _ = writeln!(out, "Team2 Gain: {:.2}", outcome.team2_gain);
    let _ = writeln!(out, "Team1 Value: {:.2}", outcome.after1.value);
    let _ = writeln!(out, "Team2 Value: {:.2}", outcome.after2.value);
}

/// One trade: teams, packages and, once executed, lineups and gains.
pub fn render_trade(trade: &Trade) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Team1: {}", trade.team1().name());
    let _ = writeln!(out, "Team2: {}", trade.team2().name());
    let _ = writeln!(out, "Assets Sent: {}", assets_line(trade.sent()));
    let _ = writeln!(out, "Assets Received: {}", assets_line(trade.received()));
    match trade.outcome() {
        Some(outcome) => outcome_block(&mut out, outcome),
        None => out.push_str("(not executed)\n"),
    }
    out
}

pub fn render_report(trades: &[Trade]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Located {} trades", trades.len());
    for trade in trades {
        out.push('\n');
        out.push_str(&render_trade(trade));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_core::{AssetRecord, LeagueProfile, TradeRequest};

    fn trades() -> Vec<Trade> {
        let profile: LeagueProfile =
            serde_json::from_str(r#"{"lineup": {"QB": 1, "RB": 1}}"#).unwrap();
        let records = vec![
            AssetRecord::new("0", "player-0", Some("QB"), 5.0, "team1"),
            AssetRecord::new("1", "player-1", Some("QB"), 5.0, "team2"),
            AssetRecord::new("2", "player-2", Some("QB"), 1.0, "team2"),
        ];
        let league = profile.build_league(&records).unwrap();
        let mut request = TradeRequest::new("team1");
        request.max_assets = 1;
        request.return_contains = vec!["player-1".into()];
        request.find_trades(&league).unwrap()
    }

    #[test]
    fn test_render_trade() {
        let trades = trades();
        let text = render_trade(&trades[0]);
        assert!(text.starts_with(RULE));
        assert!(text.contains("Team1: team1\n"));
        assert!(text.contains("Assets Sent: (player-0, QB, Value: 5.00)\n"));
        assert!(text.contains("Assets Received: (player-1, QB, Value: 5.00)\n"));
        assert!(text.contains("  QB1: player-1, QB, Value: 5.00\n"));
        assert!(text.contains("  RB1: -\n"));
        assert!(text.contains("Team2 Bench:\n  player-2, QB, Value: 1.00\n"));
        assert!(text.contains("Team1 Gain: 0.00\n"));
        assert!(text.contains("Team2 Value: 5.00\n"));
    }

    #[test]
    fn test_render_report_header() {
        let report = render_report(&trades());
        assert!(report.starts_with("Located 1 trades\n"));
        assert_eq!(report.matches(RULE).count(), 1);
    }
}
