//! Study optimizer form handling.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{generate_study_schedule, PlannerModel, StudyScheduleInput};

pub const STUDY_PLAN_FAILED: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyForm {
    pub test_date: Option<NaiveDate>,
    pub topics: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StudyPlanOutcome {
    Ready { study_schedule: String },
    /// Form problems, one message per field.
    Invalid { errors: Vec<String> },
    Failed { error: String },
}

impl StudyForm {
    /// Check every field and work out how many days are left, counting today.
    /// On failure returns one message per problem.
    pub fn validate(&self, today: NaiveDate) -> Result<StudyScheduleInput, Vec<String>> {
        let mut errors = Vec::new();
        if self.test_date.is_none() {
            errors.push("Please select the date of your test.".to_string());
        }
        if self.topics.chars().count() < 10 {
            errors.push("Please list the topics you need to study.".to_string());
        }
        let test_date = match self.test_date {
            Some(date) if errors.is_empty() => date,
            _ => return Err(errors),
        };

        let days_until_test = (test_date - today).num_days() + 1;
        if days_until_test <= 0 {
            return Err(vec!["Please select a future date for your test.".to_string()]);
        }
        Ok(StudyScheduleInput {
            test_date: test_date.format("%Y-%m-%d").to_string(),
            topics: self.topics.clone(),
            days_until_test,
        })
    }
}

/// Validate the form and ask the model for a day-by-day plan.
pub async fn create_study_plan(
    model: &dyn PlannerModel,
    form: &StudyForm,
    today: NaiveDate,
) -> StudyPlanOutcome {
    let input = match form.validate(today) {
        Ok(input) => input,
        Err(errors) => return StudyPlanOutcome::Invalid { errors },
    };
    match generate_study_schedule(model, &input).await {
        Ok(out) => StudyPlanOutcome::Ready {
            study_schedule: out.study_schedule,
        },
        Err(e) => {
            tracing::warn!(error = %e, "study plan generation failed");
            StudyPlanOutcome::Failed {
                error: STUDY_PLAN_FAILED.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::PromptRequest;
    use crate::error::AiError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Planner {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Planner {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl PlannerModel for Planner {
        async fn generate(&self, request: &PromptRequest) -> Result<Value, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AiError::Status {
                    status: 500,
                    body: "boom".into(),
                });
            }
            let days = request
                .prompt
                .lines()
                .find(|l| l.starts_with("There are"))
                .unwrap_or_default()
                .to_string();
            Ok(json!({ "studySchedule": days }))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[tokio::test]
    async fn counts_today_as_a_study_day() {
        let model = Planner::new(false);
        let form = StudyForm {
            test_date: NaiveDate::from_ymd_opt(2026, 10, 21),
            topics: "long division, fractions".into(),
        };
        let out = create_study_plan(&model, &form, today()).await;
        assert_eq!(
            out,
            StudyPlanOutcome::Ready {
                study_schedule: "There are 3 days until the test.".into()
            }
        );
    }

    #[tokio::test]
    async fn same_day_test_is_allowed() {
        let model = Planner::new(false);
        let form = StudyForm {
            test_date: Some(today()),
            topics: "spelling words list".into(),
        };
        assert!(matches!(
            create_study_plan(&model, &form, today()).await,
            StudyPlanOutcome::Ready { .. }
        ));
    }

    #[tokio::test]
    async fn reports_every_missing_field_without_calling_the_model() {
        let model = Planner::new(false);
        let out = create_study_plan(&model, &StudyForm::default(), today()).await;
        assert_eq!(
            out,
            StudyPlanOutcome::Invalid {
                errors: vec![
                    "Please select the date of your test.".into(),
                    "Please list the topics you need to study.".into(),
                ]
            }
        );
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn validate_needs_no_model() {
        let form = StudyForm {
            test_date: None,
            topics: "fractions".into(),
        };
        assert_eq!(
            form.validate(today()).unwrap_err(),
            vec![
                "Please select the date of your test.".to_string(),
                "Please list the topics you need to study.".to_string(),
            ]
        );

        let form = StudyForm {
            test_date: Some(today() + chrono::Duration::days(2)),
            topics: "fractions and decimals".into(),
        };
        assert_eq!(form.validate(today()).unwrap().days_until_test, 3);
    }

    #[tokio::test]
    async fn past_dates_are_rejected() {
        let model = Planner::new(false);
        let form = StudyForm {
            test_date: NaiveDate::from_ymd_opt(2026, 10, 18),
            topics: "volcanoes and rocks".into(),
        };
        assert_eq!(
            create_study_plan(&model, &form, today()).await,
            StudyPlanOutcome::Invalid {
                errors: vec!["Please select a future date for your test.".into()]
            }
        );
    }

    #[tokio::test]
    async fn model_failure_becomes_generic_message() {
        let model = Planner::new(true);
        let form = StudyForm {
            test_date: NaiveDate::from_ymd_opt(2026, 10, 25),
            topics: "volcanoes and rocks".into(),
        };
        assert_eq!(
            create_study_plan(&model, &form, today()).await,
            StudyPlanOutcome::Failed {
                error: STUDY_PLAN_FAILED.into()
            }
        );
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }
}
