use chrono::{Datelike, NaiveDate};
use serde_json::json;
use studyplan_core::SchedulingConfig;

pub fn show(config: &SchedulingConfig, date: NaiveDate) -> Result<(), Box<dyn std::error::Error>> {
    let policy = config.resolver().resolve_date(date);
    let (hour, minute) = policy.start_hour_minute();
    let out = json!({
        "date": date.to_string(),
        "weekday": date.weekday().to_string(),
        "start_hour": policy.start_hour,
        "end_hour": policy.end_hour,
        "start": format!("{hour:02}:{minute:02}"),
        "available_minutes": policy.available_minutes(),
        "exception": config.window.in_exception(date),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
