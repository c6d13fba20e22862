use studyplan_core::{validate_date_only, EntityLevel, Period, PeriodValue};

pub fn check(
    start: &str,
    end: Option<&str>,
    level: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let level: EntityLevel = serde_json::from_value(serde_json::Value::String(level.to_lowercase()))
        .map_err(|_| format!("unknown level '{level}'"))?;
    let period = Period::new(start, end.map(PeriodValue::from));
    validate_date_only(&period, &format!("{} period", level.label()))?;
    println!("ok");
    Ok(())
}
