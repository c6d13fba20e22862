use chrono::NaiveDate;

pub fn next(date: NaiveDate) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", studyplan_core::next_business_day(date));
    Ok(())
}
