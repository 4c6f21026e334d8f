use clap::{Subcommand, ValueEnum};
use timequest_core::lessons::{Delegation, Helper};

use super::{print_events, with_state, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum SiblingOp {
    Add,
    Remove,
}

#[derive(Subcommand)]
pub enum DelegateAction {
    /// Show the jobs and who has them
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Add or remove a big sister or brother as a helper
    Sibling {
        #[arg(value_enum)]
        op: SiblingOp,
        /// sister or brother
        who: String,
    },
    /// Hand a job to a helper (you, mom, dad, sister, brother) or "pool"
    Assign {
        task_id: String,
        to: String,
    },
    /// Check every assignment
    Check,
    /// Start a new round
    Next,
}

fn print_lesson(lesson: &Delegation) {
    println!("Family Fun Night jobs:");
    for task in lesson.board().pool() {
        println!("  {:<8} {}", task.id, task.text);
    }
    for helper in lesson.helpers() {
        println!();
        println!("{} [{}]: {}", helper.name(), helper, helper.skills());
        for task in lesson.board().bin(helper) {
            println!("  {:<8} {}", task.id, task.text);
            if let Some(verdict) = lesson.verdicts().iter().find(|v| v.task_id == task.id) {
                let mark = if verdict.correct { "✔" } else { "✘" };
                println!("           {mark} {}", verdict.message.as_deref().unwrap_or(""));
            }
        }
    }
}

pub fn run(action: DelegateAction) -> CliResult {
    with_state(|state, _, _| {
        let lesson = &mut state.delegation;
        match action {
            DelegateAction::Show { json } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(lesson)?);
                } else {
                    print_lesson(lesson);
                }
            }
            DelegateAction::Sibling { op, who } => {
                let who = who.parse::<Helper>()?;
                match op {
                    SiblingOp::Add => {
                        lesson.add_sibling(who)?;
                        println!("{} can help now", who.name());
                    }
                    SiblingOp::Remove => {
                        let returned = lesson.remove_sibling(who)?;
                        println!("{} removed; {returned} job(s) back on the list", who.name());
                    }
                }
            }
            DelegateAction::Assign { task_id, to } => {
                let to = match to.as_str() {
                    "pool" => None,
                    other => Some(other.parse::<Helper>()?),
                };
                print_events(&lesson.assign(&task_id, to)?);
            }
            DelegateAction::Check => {
                let events = lesson.check(&mut state.session.coins)?;
                print_lesson(&state.delegation);
                println!();
                print_events(&events);
            }
            DelegateAction::Next => print_events(&lesson.next_round()),
        }
        Ok(())
    })
}
