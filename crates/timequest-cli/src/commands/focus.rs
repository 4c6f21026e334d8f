use std::time::Duration;

use clap::Subcommand;
use timequest_core::lessons::{FocusQuest, FocusRunner, ItemKind};
use timequest_core::{Config, Database};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{print_events, today, CliResult, CliState};

#[derive(Subcommand)]
pub enum FocusAction {
    /// Play Focus Quest: type the number of a helpful thought and press enter
    Play {
        /// Seed for a repeatable game
        #[arg(long)]
        seed: Option<u64>,
        /// Let the computer click every helpful thought
        #[arg(long)]
        auto: bool,
    },
}

pub async fn run(action: FocusAction) -> CliResult {
    match action {
        FocusAction::Play { seed, auto } => play(seed, auto).await,
    }
}

async fn play(seed: Option<u64>, auto: bool) -> CliResult {
    let config = Config::load_or_default();
    let quest = FocusQuest::new(config.focus.clone(), config.rewards.focus_quest, seed);
    println!("Your main task: {}", quest.scenario().task);
    println!("Click on the helpful thoughts to boost your focus. Ignore the distractions!");

    let runner = FocusRunner::start(quest);
    let shared = runner.quest();
    let mut screen = tokio::time::interval(Duration::from_millis(config.focus.spawn_ms.max(100)));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = !auto;
    let done = runner.finished();
    tokio::pin!(done);

    loop {
        tokio::select! {
            _ = &mut done => break,
            _ = screen.tick() => {
                let keys: Vec<u64> = {
                    let q = shared.lock().await;
                    println!();
                    println!("time {:>2}s  focus {:>5.1}  score {}", q.time_left(), q.focus(), q.score());
                    for item in q.items() {
                        println!("  [{}] {}", item.key, item.text);
                    }
                    q.items()
                        .iter()
                        .filter(|i| auto && i.kind == ItemKind::Productive)
                        .map(|i| i.key)
                        .collect()
                };
                for key in keys {
                    runner.click(key).await;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(text) => match text.trim().parse::<u64>() {
                        Ok(key) => match runner.click(key).await {
                            Some(outcome) if outcome.kind == ItemKind::Productive => {
                                println!("+10! score {}", outcome.score)
                            }
                            Some(outcome) => println!("Oops, a distraction. score {}", outcome.score),
                            None => println!("That thought is gone."),
                        },
                        Err(_) => println!("Type the number shown next to a thought."),
                    },
                    None => stdin_open = false,
                }
            }
        }
    }

    let db = Database::open()?;
    let mut state = CliState::load(&db, &config, today())?;
    let mut quest = shared.lock().await;
    println!();
    println!("Quest Complete! Score {}", quest.score());
    println!("{}", quest.final_message());
    if !quest.misclicks().is_empty() {
        println!("Distractions you clicked:");
        for text in quest.misclicks() {
            println!("  - {text}");
        }
    }
    print_events(&quest.settle(&mut state.session.coins));
    state.save(&db)?;
    Ok(())
}
