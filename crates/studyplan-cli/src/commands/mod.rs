pub mod business_day;
pub mod card;
pub mod config;
pub mod period;
pub mod reschedule;
pub mod slot;
pub mod window;
