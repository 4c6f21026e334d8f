use chrono::NaiveDate;
use clap::Subcommand;
use timequest_core::lessons::{duration_text, TimeBlocking, TIME_BLOCKING_TIPS};
use timequest_core::{PlacementError, ScheduleGrid};

use super::{print_events, with_state, CliResult};

#[derive(Subcommand)]
pub enum BlockingAction {
    /// Show the afternoon and the task list
    Show {
        /// Switch to the board saved for this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
        /// Also print time blocking tips
        #[arg(long)]
        tips: bool,
    },
    /// Add a custom half-hour task
    Add {
        text: String,
    },
    /// Drop a task so it starts at a slot
    Drop {
        task_id: String,
        /// Slot number (0-15) or time label such as "4:30 PM"
        slot: String,
    },
    /// Send a placed task back to the task list
    Unplace {
        task_id: String,
    },
    /// Start a new round with the next task set
    Next,
}

fn resolve_slot(grid: &ScheduleGrid, slot: &str) -> Result<usize, PlacementError> {
    if let Ok(index) = slot.parse::<usize>() {
        return Ok(index);
    }
    grid.day(0)
        .iter()
        .find(|s| s.time.eq_ignore_ascii_case(slot.trim()))
        .map(|s| s.index)
        .ok_or_else(|| PlacementError::UnknownSlotId(slot.to_string()))
}

fn print_board(lesson: &TimeBlocking, date: NaiveDate) {
    println!("Afternoon schedule for {date}");
    let mut last: Option<&str> = None;
    for slot in lesson.board().grid().day(0) {
        let label = match &slot.task {
            Some(task) if last == Some(task.id.as_str()) => "  ┆".to_string(),
            Some(task) => {
                let lock = if slot.locked { " [locked]" } else { "" };
                format!("{} ({}){lock}", task.text, task.category)
            }
            None => "-".to_string(),
        };
        last = slot.task.as_ref().map(|t| t.id.as_str());
        println!("{:>2}  {:>8}  {label}", slot.index, slot.time);
    }
    println!();
    println!("Your tasks:");
    if lesson.board().pool().is_empty() {
        println!("  (all scheduled)");
    }
    for task in lesson.board().pool() {
        println!("  {:<10} {} [{}, {}]", task.id, task.text, task.category, duration_text(task.duration));
    }
    if let Some(review) = lesson.review() {
        println!();
        println!("{}", review.message);
    }
}

pub fn run(action: BlockingAction) -> CliResult {
    with_state(|state, db, _config| {
        match action {
            BlockingAction::Show { date, json, tips } => {
                if let Some(date) = date.filter(|d| *d != state.blocking_date) {
                    state.blocking.load(db, date)?;
                    state.blocking_date = date;
                }
                if json {
                    println!("{}", serde_json::to_string_pretty(&state.blocking)?);
                } else {
                    print_board(&state.blocking, state.blocking_date);
                }
                if tips {
                    println!();
                    for tip in TIME_BLOCKING_TIPS {
                        println!("  * {tip}");
                    }
                }
                return Ok(());
            }
            BlockingAction::Add { text } => {
                print_events(&state.blocking.add_custom_task(&text, &mut state.session.coins)?);
            }
            BlockingAction::Drop { task_id, slot } => {
                let start = resolve_slot(state.blocking.board().grid(), &slot)?;
                print_events(&state.blocking.drop_task(&task_id, start, &mut state.session.coins)?);
            }
            BlockingAction::Unplace { task_id } => {
                print_events(&state.blocking.unplace(&task_id)?);
            }
            BlockingAction::Next => {
                print_events(&state.blocking.next_round());
            }
        }
        state.blocking.save(db, state.blocking_date)?;
        Ok(())
    })
}
