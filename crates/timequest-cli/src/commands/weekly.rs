use clap::Subcommand;
use timequest_core::lessons::{WeeklySchedule, DAYS, SCHEDULING_TIPS, TIME_SLOTS};
use timequest_core::{Config, Database, PlannerModel};

use super::{planner, print_events, today, with_state, CliResult, CliState};

#[derive(Subcommand)]
pub enum WeeklyAction {
    /// Show the week and the task list
    Show {
        #[arg(long)]
        json: bool,
        /// Also print scheduling tips
        #[arg(long)]
        tips: bool,
    },
    /// Drop a task so it starts at a slot id such as d2-t3
    Drop {
        task_id: String,
        slot_id: String,
    },
    /// Send a placed task back to the task list
    Unplace {
        task_id: String,
    },
    /// Submit the finished week for review
    Submit {
        /// Use the built-in deadline rules instead of the AI helper
        #[arg(long)]
        offline: bool,
    },
    /// Start a new round with the next task set
    Next,
}

fn print_week(week: &WeeklySchedule) {
    let grid = week.board().grid();
    print!("{:<7}", "");
    for day in DAYS {
        print!("{:<14}", &day[..3]);
    }
    println!();
    for (index, time) in TIME_SLOTS.iter().enumerate() {
        print!("{time:<7}");
        for day in 0..DAYS.len() {
            let cell = grid
                .slot(day, index)
                .and_then(|s| s.task.as_ref())
                .map(|t| t.id.as_str())
                .unwrap_or("·");
            print!("{cell:<14}");
        }
        println!();
    }
    println!();
    println!("Tasks to schedule:");
    if week.board().is_pool_empty() {
        println!("  (all scheduled, ready to submit)");
    }
    for task in week.board().pool() {
        let due = task.deadline.and_then(|d| DAYS.get(d)).copied().unwrap_or("-");
        println!("  {:<8} {} [{}h, due {due}]", task.id, task.text, task.duration);
    }
    if let Some(review) = week.review() {
        println!();
        println!("{}", review.analysis.feedback);
    }
}

async fn submit(offline: bool) -> CliResult {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let mut state = CliState::load(&db, &config, today())?;
    let hosted = if offline { None } else { planner(&config) };
    let model = hosted.as_ref().map(|p| p as &dyn PlannerModel);
    if model.is_some() {
        println!("Our AI helper is reviewing your schedule...");
    }
    let events = state.weekly.submit(model, &mut state.session.coins).await?;
    print_events(&events);
    state.save(&db)?;
    Ok(())
}

pub async fn run(action: WeeklyAction) -> CliResult {
    if let WeeklyAction::Submit { offline } = action {
        return submit(offline).await;
    }
    with_state(|state, _, _| {
        match action {
            WeeklyAction::Show { json, tips } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&state.weekly)?);
                } else {
                    print_week(&state.weekly);
                }
                if tips {
                    println!();
                    for tip in SCHEDULING_TIPS {
                        println!("  * {tip}");
                    }
                }
            }
            WeeklyAction::Drop { task_id, slot_id } => {
                print_events(&state.weekly.drop_on(&task_id, &slot_id)?);
            }
            WeeklyAction::Unplace { task_id } => print_events(&state.weekly.unplace(&task_id)?),
            WeeklyAction::Next => print_events(&state.weekly.next_round()),
            WeeklyAction::Submit { .. } => {}
        }
        Ok(())
    })
}
