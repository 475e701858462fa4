//! ff_trade Library
//!
//! File loading, logging setup and report rendering around `ff_core`.
//! Asset records load from JSON or CSV; profiles and requests from YAML or
//! JSON.

pub mod report;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use ff_core::{AssetRecord, League, LeagueProfile, Trade, TradeRequest};

pub use report::{render_report, render_trade, BENCH_SHOWN};

/// Example profiles printed by `profile-options`.
pub const PROFILE_EXAMPLES: &[(&str, &str)] = &[
    (
        "sleeper",
        r#"platform: sleeper
lineup:
  QB: 1
  RB: 2
  WR: 2
  TE: 1
  FLEX: 2
  SUPERFLEX: 1
depth: 1
"#,
    ),
    (
        "espn",
        r#"platform: espn
lineup:
  QB: 1
  RB: 2
  WR: 2
  TE: 1
  FLEX: 2
valuation:
  strategy: bench_weighted
  window: 2
"#,
    ),
];

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Parses a YAML or JSON file into `T`, chosen by extension.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    match extension(path).as_str() {
        "json" => serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON: {}", path.display())),
        "yaml" | "yml" => serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse YAML: {}", path.display())),
        other => bail!("Unsupported config format `{}`: {}", other, path.display()),
    }
}

pub fn load_profile(path: &Path) -> Result<LeagueProfile> {
    let profile: LeagueProfile = load_config(path)?;
    profile
        .template()
        .with_context(|| format!("Invalid lineup in profile: {}", path.display()))?;
    Ok(profile)
}

pub fn load_request(path: &Path) -> Result<TradeRequest> {
    let request: TradeRequest = load_config(path)?;
    request
        .validate()
        .with_context(|| format!("Invalid trade request: {}", path.display()))?;
    Ok(request)
}

/// Normalized asset records from a `.json` array or a headed `.csv` file.
pub fn load_records(path: &Path) -> Result<Vec<AssetRecord>> {
    let records: Vec<AssetRecord> = match extension(path).as_str() {
        "json" => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read data file: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse asset records: {}", path.display()))?
        }
        "csv" => {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .trim(csv::Trim::All)
                .from_path(path)
                .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
            let mut records = Vec::new();
            for (row, result) in reader.deserialize().enumerate() {
                let record: AssetRecord = result
                    .with_context(|| format!("Invalid record on row {} of {}", row + 1, path.display()))?;
                records.push(record);
            }
            records
        }
        other => bail!("Unsupported data format `{}`: {}", other, path.display()),
    };
    info!(count = records.len(), path = %path.display(), "loaded asset records");
    Ok(records)
}

/// Canonical team names: a JSON array, or one name per line.
pub fn load_team_names(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read team names: {}", path.display()))?;
    if extension(path) == "json" {
        return serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse team names: {}", path.display()));
    }
    Ok(text.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect())
}

pub fn build_league(
    profile: &LeagueProfile,
    records: &[AssetRecord],
    team_names: Option<&[String]>,
) -> Result<League> {
    let league = match team_names {
        Some(names) => profile.build_league_with_names(records, names),
        None => profile.build_league(records),
    }
    .context("Failed to build league")?;
    debug!(teams = ?league.team_names(), "league ready");
    Ok(league)
}

/// Loads everything, runs the search and returns the ranked trades.
pub fn find_trades(
    request_path: &Path,
    profile_path: &Path,
    data_path: &Path,
    team_names_path: Option<&Path>,
) -> Result<Vec<Trade>> {
    let request = load_request(request_path)?;
    let profile = load_profile(profile_path)?;
    let records = load_records(data_path)?;
    let team_names = team_names_path.map(load_team_names).transpose()?;
    let league = build_league(&profile, &records, team_names.as_deref())?;
    let trades = request.find_trades(&league).context("Trade search failed")?;
    info!(count = trades.len(), "located trades");
    Ok(trades)
}

/// Writes the rendered report to `path`.
pub fn sink_report(path: &Path, trades: &[Trade]) -> Result<()> {
    fs::write(path, render_report(trades))
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    info!(path = %path.display(), "report written");
    Ok(())
}

/// `RUST_LOG` wins; otherwise info, or debug with `verbose`.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ff_core={level},ff_trade={level},warn")));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .try_init();
}
