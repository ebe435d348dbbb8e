//! Match statistics CLI
//!
//! Usage:
//!   matchstats normalize --config config/matchstats.toml
//!   matchstats stats --player Alice --deck Red
//!   matchstats stats --environment Standard --perspective Alice --write
//!   matchstats options
//!   matchstats append --player Bob --own-deck Red --turn 先攻 --opponent-deck Blue \
//!       --opponent Alice --result 勝ち --environment Standard

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};

use matchstats::config::Config;
use matchstats::feed::{CsvFeed, FieldInput, MatchFeed, MatchSubmission, Submitter};
use matchstats::normalize::{normalize, CanonicalMatchEntry};
use matchstats::outputs::{write_issues_jsonl, write_normalized_jsonl, write_stats_json};
use matchstats::record::{parse_date, Outcome, TurnOrder};
use matchstats::stats::{
    filter, DateRange, FilterOptions, FilterState, Perspective, Selection, StatRow, StatsReport,
};

#[derive(Parser)]
#[command(name = "matchstats")]
#[command(about = "Normalize card-game match records and report win rates")]
struct Cli {
    #[arg(long, global = true, default_value = "config/matchstats.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize the feed and write canonical records
    Normalize {
        #[arg(long)]
        out_dir: Option<String>,
    },
    /// Print win-rate statistics for the filtered records
    Stats {
        #[command(flatten)]
        filters: FilterArgs,
        /// Read outcomes from this player's side; defaults to --player when set
        #[arg(long)]
        perspective: Option<String>,
        /// Also write stats.json to the output directory
        #[arg(long)]
        write: bool,
        #[arg(long)]
        out_dir: Option<String>,
    },
    /// List the values each filter accepts
    Options,
    /// Append a new match to the feed
    Append {
        /// Defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        event: String,
        #[arg(long, default_value = "")]
        player: String,
        #[arg(long, default_value = "")]
        own_deck: String,
        #[arg(long, default_value = "先攻")]
        turn: String,
        #[arg(long, default_value = "")]
        opponent_deck: String,
        #[arg(long, default_value = "")]
        opponent: String,
        #[arg(long, default_value = "勝ち")]
        result: String,
        #[arg(long, default_value = "")]
        environment: String,
        #[arg(long, default_value = "")]
        note: String,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    from: Option<String>,
    #[arg(long)]
    to: Option<String>,
    #[arg(long, default_value = "All")]
    event: String,
    #[arg(long, default_value = "All")]
    player: String,
    #[arg(long, default_value = "All")]
    deck: String,
    #[arg(long, default_value = "All")]
    opponent_deck: String,
    #[arg(long)]
    turn: Option<String>,
    #[arg(long)]
    result: Option<String>,
    #[arg(long, default_value = "All")]
    environment: String,
    #[arg(long, default_value = "")]
    note: String,
}

fn parse_date_arg(text: &str) -> Result<NaiveDate> {
    match parse_date(text) {
        Some(date) => Ok(date),
        None => bail!("Invalid date {:?}, expected YYYY-MM-DD", text),
    }
}

fn parse_turn_arg(text: &str) -> Result<TurnOrder> {
    TurnOrder::from_label(text).with_context(|| format!("Unknown turn order {:?}", text))
}

fn parse_result_arg(text: &str) -> Result<Outcome> {
    Outcome::from_label(text).with_context(|| format!("Unknown result {:?}", text))
}

impl FilterArgs {
    fn to_state(&self, options: &FilterOptions) -> Result<FilterState> {
        let mut state = FilterState::default()
            .with_event(&self.event)
            .with_player(&self.player)
            .with_own_deck(&self.deck)
            .with_opponent_deck(&self.opponent_deck)
            .with_environment(&self.environment)
            .with_note_query(&self.note);

        if self.from.is_some() || self.to.is_some() {
            let bounds = options.default_date_range();
            let start = match &self.from {
                Some(text) => parse_date_arg(text)?,
                None => bounds.map(|b| b.start).unwrap_or(NaiveDate::MIN),
            };
            let end = match &self.to {
                Some(text) => parse_date_arg(text)?,
                None => bounds.map(|b| b.end).unwrap_or(NaiveDate::MAX),
            };
            state.date_range = Some(DateRange::new(start, end));
        }

        if let Some(turn) = self.turn.as_deref().filter(|t| *t != "All") {
            state.turn_order = Selection::Only(parse_turn_arg(turn)?);
        }
        if let Some(result) = self.result.as_deref().filter(|r| *r != "All") {
            state.outcome = Selection::Only(parse_result_arg(result)?);
        }

        Ok(state)
    }
}

fn load_records(config: &Config) -> Result<Vec<CanonicalMatchEntry>> {
    let feed = CsvFeed::from_config(&config.feed);
    let rows = feed.fetch_rows()?;
    let normalized = normalize(&rows);
    if !normalized.skipped.is_empty() {
        tracing::warn!("{} feed rows were skipped", normalized.skipped.len());
    }
    Ok(normalized.records)
}

fn run_normalize_command(config: &Config, out_dir: Option<String>) -> Result<()> {
    let feed = CsvFeed::from_config(&config.feed);
    tracing::info!("Normalizing feed {:?}", feed.path());

    let rows = feed.fetch_rows()?;
    let normalized = normalize(&rows);

    let dir = out_dir.unwrap_or_else(|| config.output.dir.clone());
    write_normalized_jsonl(&dir, &normalized.records)?;
    write_issues_jsonl(&dir, &normalized)?;

    let summary = normalized.summary();
    println!("\n=== Normalize Summary ===");
    println!("Feed rows: {}", summary.rows);
    println!("Records: {}", summary.records);
    println!("Duplicates dropped: {}", summary.duplicates_dropped);
    println!("Skipped rows: {}", summary.skipped);
    println!("Data quality warnings: {}", summary.warnings);

    Ok(())
}

fn print_table(title: &str, rows: &[StatRow]) {
    println!("\n{}", title);
    if rows.is_empty() {
        println!("  (no data)");
        return;
    }
    for row in rows {
        println!(
            "  {:<24} {:>6.1}%  ({}/{})",
            row.key,
            row.win_rate * 100.0,
            row.wins,
            row.games
        );
    }
}

fn run_stats_command(
    config: &Config,
    filters: &FilterArgs,
    perspective: Option<String>,
    write: bool,
    out_dir: Option<String>,
) -> Result<()> {
    let records = load_records(config)?;
    let options = FilterOptions::from_records(&records);
    let state = filters.to_state(&options)?;

    let filtered = filter(&records, &state);
    tracing::info!("{} of {} records match the filters", filtered.len(), records.len());

    let perspective = Perspective::for_filters(&state, perspective);
    let report = StatsReport::compute(&filtered, &perspective);

    println!("\n=== Match Statistics ===");
    if report.is_empty() {
        println!("No matches for the current filters.");
    } else {
        println!(
            "Overall: {:.1}% ({} wins / {} losses)",
            report.overall.win_rate() * 100.0,
            report.overall.wins,
            report.overall.losses
        );
        print_table("By environment:", &report.by_environment);
        print_table("By opponent deck:", &report.by_opponent_deck);
        println!("\nBy turn order:");
        println!(
            "  {:<24} {:>6.1}%  ({} games)",
            TurnOrder::First.label(),
            report.turn_order.first_win_rate * 100.0,
            report.turn_order.first_games
        );
        println!(
            "  {:<24} {:>6.1}%  ({} games)",
            TurnOrder::Second.label(),
            report.turn_order.second_win_rate * 100.0,
            report.turn_order.second_games
        );
    }

    if write {
        let dir = out_dir.unwrap_or_else(|| config.output.dir.clone());
        write_stats_json(&dir, &report)?;
    }

    Ok(())
}

fn run_options_command(config: &Config) -> Result<()> {
    let records = load_records(config)?;
    let options = FilterOptions::from_records(&records);

    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}

fn run_append_command(config: &Config, submission: MatchSubmission) -> Result<()> {
    let feed = CsvFeed::from_config(&config.feed);
    let mut submitter = Submitter::new(feed, config.sheet_id().map(str::to_string));

    let entry = submitter.submit(&submission)?;
    println!(
        "Added {} ({}) vs {} ({}) on {} at row {}",
        entry.player, entry.own_deck, entry.opponent, entry.opponent_deck, entry.date, entry.source.row
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Normalize { out_dir } => run_normalize_command(&config, out_dir)?,
        Commands::Stats { filters, perspective, write, out_dir } => {
            run_stats_command(&config, &filters, perspective, write, out_dir)?
        }
        Commands::Options => run_options_command(&config)?,
        Commands::Append {
            date,
            event,
            player,
            own_deck,
            turn,
            opponent_deck,
            opponent,
            result,
            environment,
            note,
        } => {
            let date = match date {
                Some(text) => parse_date_arg(&text)?,
                None => Local::now().date_naive(),
            };
            let submission = MatchSubmission {
                date,
                event: FieldInput::typed(&event),
                player: FieldInput::typed(&player),
                own_deck: FieldInput::typed(&own_deck),
                turn_order: parse_turn_arg(&turn)?,
                opponent_deck: FieldInput::typed(&opponent_deck),
                opponent: FieldInput::typed(&opponent),
                outcome: parse_result_arg(&result)?,
                environment: FieldInput::typed(&environment),
                note,
            };
            run_append_command(&config, submission)?
        }
    }

    Ok(())
}
