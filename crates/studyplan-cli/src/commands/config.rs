use std::path::Path;

use clap::Subcommand;
use studyplan_core::SchedulingConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration as TOML
    Show,
    /// Print the config file location
    Path,
    /// Validate the active configuration
    Check,
}

pub fn run(
    config: &SchedulingConfig,
    explicit: Option<&Path>,
    action: ConfigAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        }
        ConfigAction::Path => match explicit {
            Some(path) => println!("{}", path.display()),
            None => println!("{}", SchedulingConfig::path()?.display()),
        },
        ConfigAction::Check => {
            config.validate()?;
            println!("ok");
        }
    }
    Ok(())
}

