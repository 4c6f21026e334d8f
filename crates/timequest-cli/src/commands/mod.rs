pub mod blocking;
pub mod calendar;
pub mod coins;
pub mod config;
pub mod delegate;
pub mod focus;
pub mod goals;
pub mod lesson;
pub mod pricing;
pub mod priority;
pub mod session;
pub mod study;
pub mod todo;
pub mod weekly;

mod state;

pub use state::{with_state, CliState};

use chrono::NaiveDate;
use timequest_core::{Config, Event, HttpPlanner};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Print each event as one line of plain text.
pub fn print_events(events: &[Event]) {
    for event in events {
        match event {
            Event::TaskPlaced { task_id, day, start, duration, .. } => {
                println!("placed {task_id} on day {day} at slot {start} ({duration} slots)")
            }
            Event::TaskUnplaced { task_id, .. } => println!("{task_id} returned to the task list"),
            Event::TaskSorted { task_id, bin, .. } => println!("{task_id} -> {bin}"),
            Event::TaskAdded { task_id, text, .. } => println!("added {text} ({task_id})"),
            Event::LessonFinished { passed, message, .. } => {
                let mark = if *passed { "✔" } else { "✘" };
                println!("{mark} {message}")
            }
            Event::CoinsAwarded { amount, balance, .. } => println!("+{amount} coins (balance {balance})"),
            Event::RoundStarted { set_index, .. } => println!("new round (set {})", set_index + 1),
        }
    }
}

/// The hosted planner, if an API key is configured.
pub fn planner(config: &Config) -> Option<HttpPlanner> {
    let ai = config.ai.clone().with_env_overrides();
    match HttpPlanner::from_config(&ai) {
        Ok(planner) => Some(planner),
        Err(e) => {
            tracing::info!(error = %e, "planner model unavailable");
            None
        }
    }
}
