//! Green Challenge
//!
//! Leaderboard and scoring CLI for the residence hall utility competition.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::{info, warn};
use rusqlite::Connection;
use serde::Serialize;

use green_challenge::admin::{self, AdminCapability};
use green_challenge::aggregate::{LeaderboardReport, chart_series, top_halls};
use green_challenge::dashboard::{build_snapshot, resource_rankings};
use green_challenge::models::{Resource, WeeklyReading};
use green_challenge::timeline::{self, CompetitionCalendar};
use green_challenge::{db, halls, ingest, seed};

#[derive(Parser)]
#[command(name = "green-challenge")]
#[command(about = "Residence hall utility-consumption competition scoring")]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, env = "GREEN_CHALLENGE_DB", default_value = "green_challenge.db")]
    database: PathBuf,

    /// Admin secret that submission tokens are checked against
    #[arg(long, env = "GREEN_CHALLENGE_ADMIN_SECRET", hide_env_values = true)]
    admin_secret: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Pin the current time (RFC 3339) for timeline views
    #[arg(long, global = true)]
    now: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize empty database with schema
    Init,

    /// Replace the history with generated January-March data
    Seed {
        /// Random seed for reproducible data
        #[arg(long, default_value = "2024")]
        rng_seed: u64,
    },

    /// Import a directory of wide-format week JSON files
    Import {
        dir: PathBuf,

        /// Clear existing weeks before import
        #[arg(long)]
        clear: bool,
    },

    /// Export the history as wide-format week JSON files
    Export { dir: PathBuf },

    /// Submit a new week as comma-separated values (electricity, gas, water per hall)
    Submit {
        csv: String,

        /// Admin token
        #[arg(long)]
        token: Option<String>,

        /// Week start (RFC 3339); defaults to now
        #[arg(long)]
        start: Option<String>,
    },

    /// Overall standings
    Leaderboard {
        /// Show standings as of this week
        #[arg(short, long)]
        week: Option<usize>,
    },

    /// Current-week ranking for one resource
    Rankings {
        resource: Resource,

        #[arg(short, long)]
        week: Option<usize>,
    },

    /// Dashboard and weekly history for one hall
    Hall {
        name: String,

        #[arg(short, long)]
        week: Option<usize>,
    },

    /// Competition calendar
    Timeline,

    /// Final results podium
    Results,

    /// Print the admin CSV template and hall order
    Template,
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Invalid timestamp {raw:?} (expected RFC 3339)"))?
        .with_timezone(&Utc))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prefix of the history up to `week` (all of it when unset).
fn weeks_as_of(history: &[WeeklyReading], week: Option<usize>) -> &[WeeklyReading] {
    let n = week.unwrap_or(history.len()).min(history.len());
    &history[..n]
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn report_gaps(history: &[WeeklyReading]) {
    if let Err(e) = timeline::validate_timeline(history) {
        eprintln!("Timeline data error: {e}. Please contact the administrator.");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let now = match &cli.now {
        Some(raw) => parse_instant(raw)?,
        None => Utc::now(),
    };

    let conn = Connection::open(&cli.database)
        .with_context(|| format!("Failed to open {}", cli.database.display()))?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Init => {
            println!(
                "Database initialized at: {} ({} weeks stored)",
                cli.database.display(),
                db::week_count(&conn)?
            );
        }

        Commands::Seed { rng_seed } => {
            db::clear_history(&conn)?;
            let weeks = seed::generate_historical(rng_seed);
            db::append_weeks(&conn, &weeks)?;
            println!("Seeded {} weeks of historical data", weeks.len());
        }

        Commands::Import { dir, clear } => {
            if clear {
                info!("Clearing existing weeks");
                db::clear_history(&conn)?;
            }
            let (weeks, stats) = ingest::import_dir(&dir)?;
            ingest::ensure_appendable(&db::load_history(&conn)?, &weeks)?;
            db::append_weeks(&conn, &weeks)?;
            println!("{}", stats);
            report_gaps(&db::load_history(&conn)?);
        }

        Commands::Export { dir } => {
            let history = db::load_history(&conn)?;
            let written = ingest::export_dir(&history, &dir)?;
            println!("Wrote {} week files to {}", written, dir.display());
        }

        Commands::Submit { csv, token, start } => {
            let cap = AdminCapability::authorize(token.as_deref(), cli.admin_secret.as_deref())?;
            let start = match start {
                Some(raw) => parse_instant(&raw)?,
                None => now,
            };
            let week = admin::submit_week(&cap, &csv, start)?;
            db::append_week(&conn, &week)?;

            // Every view is rebuilt from the full history.
            let history = db::load_history(&conn)?;
            println!("Week {} added.", history.len());
            report_gaps(&history);
            print!("{}", LeaderboardReport::as_of(&history, history.len()));
        }

        Commands::Leaderboard { week } => {
            let history = db::load_history(&conn)?;
            let report = LeaderboardReport::as_of(&history, week.unwrap_or(history.len()));
            if cli.json {
                print_json(&report.standings)?;
            } else {
                print!("{}", report);
            }
        }

        Commands::Rankings { resource, week } => {
            let history = db::load_history(&conn)?;
            let snapshot = build_snapshot(weeks_as_of(&history, week));
            let rows = resource_rankings(&snapshot, resource);
            if cli.json {
                print_json(&rows)?;
            } else if rows.is_empty() {
                println!("No weekly data yet.");
            } else {
                println!(
                    "{:<4} {:<24} {:>14} {:>6}",
                    "Rank",
                    "Hall",
                    resource.normalized_unit(),
                    "Pts"
                );
                println!("{}", "-".repeat(51));
                for (index, (hall, value, points)) in rows.iter().enumerate() {
                    println!("{:<4} {:<24} {:>14.4} {:>6}", index + 1, hall, value, points);
                }
            }
        }

        Commands::Hall { name, week } => {
            let history = db::load_history(&conn)?;
            let weeks = weeks_as_of(&history, week);
            let snapshot = build_snapshot(weeks);
            let hall = snapshot
                .get(&name)
                .ok_or_else(|| anyhow!("Hall '{}' not found in week {}", name, weeks.len()))?;

            if cli.json {
                print_json(hall)?;
                return Ok(());
            }

            println!("Hall: {}", name);
            if halls::building_size(&name).is_none() {
                warn!("No floor area on record for {name}; values are not normalized");
            }
            for resource in Resource::ALL {
                println!(
                    "  {:<12} {:>10.4} {:<14} {} pts",
                    resource.label(),
                    hall.current.get(resource),
                    resource.normalized_unit(),
                    hall.points.get(resource)
                );
            }
            println!("  Total: {} pts", hall.points.total);
            println!();
            println!(
                "{:<5} {:<12} {:>10} {:>10} {:>10} {:>6}",
                "Week", "Start", "Elec", "Gas", "Water", "Total"
            );
            for entry in &hall.weekly_history {
                println!(
                    "{:<5} {:<12} {:>10.4} {:>10.4} {:>10.4} {:>6}",
                    entry.week_number,
                    entry.start_date.format("%Y-%m-%d"),
                    entry.metrics.electricity,
                    entry.metrics.gas,
                    entry.metrics.water,
                    entry.points.total
                );
            }
            let chart = chart_series(weeks, &name);
            if let Some(last) = chart.last() {
                println!("\nProgress: {} pts after {} weeks", last.points, last.week_number);
            }
        }

        Commands::Timeline => {
            let history = db::load_history(&conn)?;
            let events = timeline::generate_timeline(history.len(), now);
            if cli.json {
                print_json(&events)?;
            } else {
                println!("=== Competition Timeline ===");
                for event in &events {
                    let marker = if event.is_current_week {
                        "<- current"
                    } else if event.is_future {
                        "(locked)"
                    } else {
                        ""
                    };
                    println!(
                        "Week {:>2}  {} - {}  {}",
                        event.week_number,
                        event.start_date.format("%b %d"),
                        event.end_date.format("%b %d"),
                        marker
                    );
                }
                if let Some(index) = timeline::current_week_index(&history, now) {
                    println!("\nLatest data covers now: week {}", index + 1);
                }
            }
            report_gaps(&history);
        }

        Commands::Results => {
            let history = db::load_history(&conn)?;
            let calendar = CompetitionCalendar::default();
            let report = LeaderboardReport::as_of(&history, history.len());
            let podium = top_halls(&report.standings, 5);
            if cli.json {
                print_json(podium)?;
                return Ok(());
            }
            if timeline::is_complete(&history, &calendar) {
                println!("=== Final Results ===");
            } else {
                println!(
                    "Competition in progress: {} of {} weeks. Current leaders:",
                    history.len(),
                    calendar.week_count()
                );
            }
            for (index, standing) in podium.iter().enumerate() {
                println!("  {}. {} ({} pts)", index + 1, standing.name, standing.points);
            }
        }

        Commands::Template => {
            println!("{}", admin::csv_template());
            println!();
            println!("Order (electricity kW, gas therm, water US gal/min per hall):");
            for (index, hall) in halls::roster().enumerate() {
                println!("  {:>2}. {}", index + 1, hall);
            }
        }
    }

    Ok(())
}
