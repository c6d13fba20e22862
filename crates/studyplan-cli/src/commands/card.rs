use studyplan_core::{CardValidator, DatabaseFamily, SchedulingConfig};

pub fn validate(
    config: &SchedulingConfig,
    family: &str,
    payload: &str,
    parent_id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let family: DatabaseFamily = family.parse()?;
    let payload: serde_json::Value = serde_json::from_str(payload)?;
    let card = CardValidator::new(config.cards.max_title_length).parse(&payload, family, parent_id)?;
    println!("{}", serde_json::to_string_pretty(&card)?);
    Ok(())
}
