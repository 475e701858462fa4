//! ff_trade CLI
//!
//! Finds mutually beneficial trades for one team of a fantasy league.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "ff_trade")]
#[command(about = "Find and rank fantasy league trades", long_about = None)]
struct Cli {
    /// Debug level logging (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Search trades for the requesting team
    FindTrades {
        /// Trade request file (.yaml, .yml or .json)
        #[arg(long)]
        request: PathBuf,

        /// League profile file (.yaml, .yml or .json)
        #[arg(long)]
        profile: PathBuf,

        /// Asset records (.json or .csv)
        #[arg(long)]
        data: PathBuf,

        /// Canonical team names to reconcile record team names against
        #[arg(long)]
        team_names: Option<PathBuf>,

        /// Write the report to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print example league profiles
    ProfileOptions,

    /// Print the keys a trade request accepts
    TradeOptions,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    ff_trade::init_logging(cli.verbose);

    match cli.command {
        Commands::FindTrades { request, profile, data, team_names, out } => {
            let trades =
                ff_trade::find_trades(&request, &profile, &data, team_names.as_deref())?;
            match out {
                Some(path) => {
                    ff_trade::sink_report(&path, &trades)?;
                    println!("Located {} trades, report written to {}", trades.len(), path.display());
                }
                None => print!("{}", ff_trade::render_report(&trades)),
            }
        }

        Commands::ProfileOptions => {
            for (platform, example) in ff_trade::PROFILE_EXAMPLES {
                println!("# {}", platform);
                println!("{}", example);
            }
        }

        Commands::TradeOptions => {
            for (key, description) in ff_core::REQUEST_KEYS {
                println!("{}: {}", key, description);
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("ff_trade CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
