use clap::Subcommand;
use timequest_core::lessons::{Prioritization, Quadrant, PRIORITIZATION_TIPS};

use super::{print_events, with_state, CliResult};

#[derive(Subcommand)]
pub enum PriorityAction {
    /// Show the task list and the four quadrants
    Show {
        #[arg(long)]
        json: bool,
        /// Also print prioritization tips
        #[arg(long)]
        tips: bool,
    },
    /// Move a task into a quadrant (do, schedule, delegate, delete) or "pool"
    Move {
        task_id: String,
        to: String,
    },
    /// Check every sorted task
    Check,
    /// Start a new round with the next task set
    Next,
}

fn mark(lesson: &Prioritization, task_id: &str) -> &'static str {
    match lesson.verdicts().iter().find(|v| v.task_id == task_id) {
        Some(v) if v.correct => " ✔",
        Some(_) => " ✘",
        None => "",
    }
}

fn print_lesson(lesson: &Prioritization) {
    println!("Tasks:");
    for task in lesson.board().pool() {
        println!("  {:<8} {}", task.id, task.text);
    }
    for quadrant in Quadrant::ALL {
        println!();
        println!("{} ({}) [{}]", quadrant.title(), quadrant.description(), quadrant);
        for task in lesson.board().bin(quadrant) {
            println!("  {:<8} {}{}", task.id, task.text, mark(lesson, &task.id));
        }
    }
}

pub fn run(action: PriorityAction) -> CliResult {
    with_state(|state, _, _| {
        let lesson = &mut state.priority;
        match action {
            PriorityAction::Show { json, tips } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(lesson)?);
                } else {
                    print_lesson(lesson);
                }
                if tips {
                    println!();
                    for tip in PRIORITIZATION_TIPS {
                        println!("  * {tip}");
                    }
                }
            }
            PriorityAction::Move { task_id, to } => {
                let to = match to.as_str() {
                    "pool" => None,
                    other => Some(other.parse::<Quadrant>()?),
                };
                print_events(&lesson.move_task(&task_id, to)?);
            }
            PriorityAction::Check => {
                let events = lesson.check(&mut state.session.coins)?;
                print_lesson(&state.priority);
                println!();
                print_events(&events);
            }
            PriorityAction::Next => print_events(&lesson.next_round()),
        }
        Ok(())
    })
}
