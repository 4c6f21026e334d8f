use chrono::NaiveDate;
use clap::Subcommand;
use timequest_core::ai::{create_study_plan, StudyForm, StudyPlanOutcome};
use timequest_core::{Config, HttpPlanner};

use super::{today, CliResult};

#[derive(Subcommand)]
pub enum StudyAction {
    /// Ask the AI study optimizer for a day-by-day plan
    Plan {
        /// Test date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// What the test covers
        #[arg(long, default_value = "")]
        topics: String,
    },
}

pub async fn run(action: StudyAction) -> CliResult {
    match action {
        StudyAction::Plan { date, topics } => {
            let form = StudyForm {
                test_date: date,
                topics,
            };
            if let Err(errors) = form.validate(today()) {
                return Err(errors.join("\n").into());
            }
            let config = Config::load_or_default();
            let ai = config.ai.clone().with_env_overrides();
            let planner = HttpPlanner::from_config(&ai)?;
            match create_study_plan(&planner, &form, today()).await {
                StudyPlanOutcome::Ready { study_schedule } => println!("{study_schedule}"),
                StudyPlanOutcome::Invalid { errors } => return Err(errors.join("\n").into()),
                StudyPlanOutcome::Failed { error } => return Err(error.into()),
            }
        }
    }
    Ok(())
}
