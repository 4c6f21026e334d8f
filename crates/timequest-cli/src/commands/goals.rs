use clap::Subcommand;
use timequest_core::lessons::{SmartGoals, SmartStep};
use timequest_core::{Config, Database, PlannerModel};

use super::{planner, print_events, today, with_state, CliResult, CliState};

#[derive(Subcommand)]
pub enum GoalsAction {
    /// Show the current step
    Show,
    /// Answer the current step
    Answer {
        text: String,
    },
    /// Go to the next step
    Next {
        /// Skip the AI helper's tailored examples
        #[arg(long)]
        offline: bool,
    },
    /// Go back one step
    Back,
    /// Start over
    Reset,
}

fn print_step(goals: &SmartGoals) {
    let step = goals.step();
    if step == SmartStep::Summary {
        println!("{}", step.title());
        for (label, answer) in goals.summary() {
            println!("  {label:<12} {answer}");
        }
        return;
    }
    println!("[{}%] {}", goals.progress(), step.title());
    println!("{}", step.question());
    println!("{}", step.description());
    let answer = goals.answer_for(step);
    if answer.is_empty() {
        println!("  {}", goals.placeholder(step));
    } else {
        println!("  > {answer}");
    }
}

async fn next(offline: bool) -> CliResult {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let mut state = CliState::load(&db, &config, today())?;
    let hosted = if offline { None } else { planner(&config) };
    let model = hosted.as_ref().map(|p| p as &dyn PlannerModel);
    let events = state.goals.next(model, &mut state.session.coins).await?;
    print_events(&events);
    print_step(&state.goals);
    state.save(&db)?;
    Ok(())
}

pub async fn run(action: GoalsAction) -> CliResult {
    if let GoalsAction::Next { offline } = action {
        return next(offline).await;
    }
    with_state(|state, _, _| {
        match action {
            GoalsAction::Show => print_step(&state.goals),
            GoalsAction::Answer { text } => {
                state.goals.answer(&text)?;
                print_step(&state.goals);
            }
            GoalsAction::Back => {
                state.goals.back();
                print_step(&state.goals);
            }
            GoalsAction::Reset => {
                print_events(&state.goals.reset());
                print_step(&state.goals);
            }
            GoalsAction::Next { .. } => {}
        }
        Ok(())
    })
}
