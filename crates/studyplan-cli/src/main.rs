use std::path::PathBuf;

use clap::{Parser, Subcommand};
use studyplan_core::SchedulingConfig;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyplan", version, about = "Studyplan CLI")]
struct Cli {
    /// Config file to use instead of ~/.config/studyplan/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the study window for a date
    Window {
        /// Date (YYYY-MM-DD)
        date: chrono::NaiveDate,
    },
    /// Validate a session start and duration
    Slot {
        /// Start timestamp with offset (e.g. 2025-11-03T19:00:00-03:00)
        start: String,
        /// Duration in minutes
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },
    /// Check that a container period has no time of day
    CheckPeriod {
        start: String,
        end: Option<String>,
        /// Entity level used in the error message
        #[arg(long, default_value = "course")]
        level: String,
    },
    /// Next Monday-to-Friday date after DATE
    NextBusinessDay {
        /// Date (YYYY-MM-DD)
        date: chrono::NaiveDate,
    },
    /// Re-anchor a container's sessions on a new start date
    Reschedule(commands::reschedule::RescheduleArgs),
    /// Validate a card payload
    ValidateCard {
        /// Database family (study, work, personal, video-series)
        #[arg(long)]
        family: String,
        /// JSON payload
        #[arg(long)]
        payload: String,
        /// Parent the card is created under
        #[arg(long)]
        parent_id: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SchedulingConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(SchedulingConfig::load_from(path)?),
        None => Ok(SchedulingConfig::load_or_default()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("STUDYPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Commands::Window { date } => commands::window::show(&config, date),
        Commands::Slot { start, minutes } => commands::slot::enforce(&config, &start, minutes),
        Commands::CheckPeriod { start, end, level } => {
            commands::period::check(&start, end.as_deref(), &level)
        }
        Commands::NextBusinessDay { date } => commands::business_day::next(date),
        Commands::Reschedule(args) => commands::reschedule::run(&config, args),
        Commands::ValidateCard {
            family,
            payload,
            parent_id,
        } => commands::card::validate(&config, &family, &payload, parent_id.as_deref()),
        Commands::Config { action } => commands::config::run(&config, cli.config.as_deref(), action),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
