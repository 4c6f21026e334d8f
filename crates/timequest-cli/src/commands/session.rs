use clap::Subcommand;
use timequest_core::{Config, Database};

use super::{today, CliResult, CliState};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Throw away coins, calendar, to-dos and lesson progress
    Reset,
}

pub fn run(action: SessionAction) -> CliResult {
    match action {
        SessionAction::Reset => {
            let db = Database::open()?;
            let config = Config::load_or_default();
            CliState::clear(&db)?;
            CliState::new(&config.rewards, today()).save(&db)?;
            println!("started a new session");
        }
    }
    Ok(())
}
