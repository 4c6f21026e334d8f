use clap::Subcommand;

use super::{with_state, CliResult};

#[derive(Subcommand)]
pub enum CoinsAction {
    /// Show the coin balance
    Show,
}

pub fn run(action: CoinsAction) -> CliResult {
    match action {
        CoinsAction::Show => with_state(|state, _, _| {
            println!("{} coins", state.session.coins.coins());
            Ok(())
        }),
    }
}
