use std::path::PathBuf;

use clap::Args;
use serde_json::json;
use studyplan_core::{reschedule_container, ApplyMode, InMemoryPageStore, SchedulingConfig};

#[derive(Args)]
pub struct RescheduleArgs {
    /// JSON file holding the page store ({"sessions": [...]})
    #[arg(long)]
    input: PathBuf,
    /// Container whose sessions are moved
    #[arg(long)]
    container: String,
    /// New anchor date (YYYY-MM-DD)
    #[arg(long)]
    new_start: chrono::NaiveDate,
    /// Apply sessions placed before a failure
    #[arg(long)]
    partial: bool,
    /// Write the updated store back to the input file
    #[arg(long)]
    write: bool,
}

pub fn run(config: &SchedulingConfig, args: RescheduleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(&args.input)?;
    let mut store: InMemoryPageStore = serde_json::from_str(&content)?;
    let mode = if args.partial {
        ApplyMode::Partial
    } else {
        ApplyMode::AllOrNothing
    };

    tracing::debug!(
        input = %args.input.display(),
        container = %args.container,
        sessions = store.sessions.len(),
        "rescheduling container"
    );
    let report = reschedule_container(
        &mut store,
        &config.rescheduler()?,
        &args.container,
        args.new_start,
        mode,
    )?;

    let failure = report.failure.as_ref().map(|f| {
        json!({
            "session": f.failed_id,
            "error": f.source.to_string(),
            "computed_before_failure": f.completed,
        })
    });
    let out = json!({
        "applied": report.applied,
        "failure": failure,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);

    if args.write && !report.applied.is_empty() {
        std::fs::write(&args.input, serde_json::to_string_pretty(&store)?)?;
    }

    match report.failure {
        Some(failure) => Err(failure.into()),
        None => Ok(()),
    }
}
