// Analyzer entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout carries the comparison table)
// 2. Parse CLI arguments
// 3. Load config and dataset
// 4. Validate league shape and punt set at the input boundary
// 5. Run one comparison and print the table

use ninecat::config;
use ninecat::dataset;
use ninecat::scoring::category::PuntSet;
use ninecat::scoring::gscore::{self, ComparisonResult, Side};
use ninecat::scoring::pool::LeagueSettings;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "ninecat", about = "NBA 9-category fantasy player comparison")]
struct Cli {
    /// First player to compare (exact dataset name).
    player1: String,

    /// Second player to compare.
    player2: String,

    /// Number of teams in the league (overrides config).
    #[arg(long)]
    teams: Option<usize>,

    /// Roster spots per team (overrides config).
    #[arg(long)]
    roster_size: Option<usize>,

    /// Category to punt (repeatable, max 4): FG%, FT%, 3PTM, PTS, REB, AST,
    /// STL, BLK, TOV.
    #[arg(long = "punt", value_name = "CATEGORY")]
    punts: Vec<String>,

    /// Dataset CSV path (overrides config).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Directory containing config/analyzer.toml (defaults to the cwd).
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config_dir {
        Some(dir) => config::load_config_from(dir),
        None => config::load_config(),
    }
    .context("failed to load configuration")?;

    let data_path = cli
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.dataset.path));
    let dataset = dataset::load_dataset(&data_path)
        .with_context(|| format!("failed to load dataset {}", data_path.display()))?;
    info!(
        "dataset ready: {} players, {} weeks",
        dataset.len(),
        dataset.weeks()
    );

    let league = LeagueSettings::new(
        cli.teams.unwrap_or(config.league.num_teams),
        cli.roster_size.unwrap_or(config.league.roster_size),
    )?;
    let punts = PuntSet::new(&cli.punts)?;

    let result = gscore::compare_players(&dataset, &cli.player1, &cli.player2, &league, &punts)?;
    print_comparison(&result);
    Ok(())
}

/// Print the comparison table. The better side of each row is marked `*`.
fn print_comparison(result: &ComparisonResult) {
    let mark = |better: Option<Side>, side: Side| if better == Some(side) { "*" } else { " " };

    println!(
        "{:>24}   {:>7}  {:^8}  {:<7}   {:<24}",
        result.player1, "G Score", "Category", "G Score", result.player2
    );
    for row in &result.rows {
        println!(
            "{:>24}  {}{:>7}  {:^8}  {:<7}{}  {:<24}",
            row.raw1,
            mark(row.better, Side::PlayerOne),
            row.score1.to_string(),
            row.label,
            row.score2.to_string(),
            mark(row.better, Side::PlayerTwo),
            row.raw2,
        );
    }
    println!(
        "{:>24}  {}{:>7}  {:^8}  {:<7}{}  {:<24}",
        "",
        mark(result.overall_better, Side::PlayerOne),
        result.overall1.to_string(),
        "OVERALL",
        result.overall2.to_string(),
        mark(result.overall_better, Side::PlayerTwo),
        "",
    );
}

/// Initialize tracing to stderr so stdout stays clean for the table output.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ninecat=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
