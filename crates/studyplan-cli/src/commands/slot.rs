use chrono::DateTime;
use studyplan_core::SchedulingConfig;

pub fn enforce(
    config: &SchedulingConfig,
    start: &str,
    minutes: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = DateTime::parse_from_rfc3339(start)
        .map_err(|e| format!("invalid start '{start}': {e}"))?;
    let slot = config.enforcer().enforce(start, minutes)?;
    println!("{}", serde_json::to_string_pretty(&slot)?);
    Ok(())
}
