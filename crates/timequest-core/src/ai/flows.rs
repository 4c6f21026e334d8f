//! The three prompt flows: study optimizer, schedule analyzer and SMART goal
//! generator.

use indoc::indoc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;

use super::{PlannerModel, PromptRequest};
use crate::error::AiError;
use crate::feedback::ScheduleAnalysis;

const STUDY_OPTIMIZER_PROMPT: &str = indoc! {r#"
    You are an AI study planner that helps young students. You will generate a study schedule based on the number of days until the test and the topics provided.

    There are {{{daysUntilTest}}} days until the test.
    Topics: {{{topics}}}

    Generate a study plan for each of the {{{daysUntilTest}}} days. Use a "Day 1", "Day 2", etc. format. Each day should be on a new line. Break down the topics into small, easy-to-manage tasks for each day. If there are many days, you can include rest days. Keep the language simple and encouraging. Do not include external resources, just focus on the tasks."#};

const SCHEDULE_ANALYZER_PROMPT: &str = indoc! {r#"
    You are an AI assistant that helps young students with time management. You will analyze the provided weekly schedule and give feedback.

    Each entry lists the day, the time, the task and when that task is due.

    Analyze the schedule for the following:
    1.  **Procrastination:** Are all the study sessions crammed in right before the deadline?
    2.  **Balance:** Is the work spread out across the week? Is there time for rest?
    3.  **Efficiency:** Did the student schedule tasks logically?

    Based on your analysis, provide one piece of actionable, encouraging, and simple feedback. If the schedule is good, praise the student and explain why it's a good plan (e.g., "Spreading out your science project work is a great idea!"). If it could be improved, gently suggest a change (e.g., "Your plan looks good! To make it even better, maybe try studying for your math test a little on Monday too?").

    Set the 'isGood' flag to true if the schedule is reasonably well-planned, especially if it avoids last-minute cramming.

    The user's schedule:
    {{{schedule}}}"#};

const SMART_GOAL_PROMPT: &str = indoc! {r#"
    You are an AI assistant helping a young student turn a goal into a SMART goal.
    The user's goal is: "{{{goal}}}"

    Based on this goal, generate simple, kid-friendly examples for each of the SMART categories.
    - For "specific", rewrite the goal to be much more detailed.
    - For "measurable", describe how they could track progress.
    - For "achievable", ask a simple question about whether it's possible.
    - For "relevant", suggest a reason why this goal might be important to them.
    - For "timeBound", suggest a clear deadline or timeframe.

    Keep the language simple, encouraging, and easy for a 10-year-old to understand. Each example should be a single sentence."#};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyScheduleInput {
    /// `YYYY-MM-DD`
    pub test_date: String,
    pub topics: String,
    pub days_until_test: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyScheduleOutput {
    pub study_schedule: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleAnalyzerInput {
    /// The formatted weekly schedule as JSON text.
    pub schedule: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SmartGoalInput {
    pub goal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SmartGoalExamples {
    pub specific: String,
    pub measurable: String,
    pub achievable: String,
    pub relevant: String,
    pub time_bound: String,
}

/// Substitute `{{{name}}}` placeholders.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{{{{{name}}}}}}}"), value)
    })
}

async fn run<T: DeserializeOwned>(
    model: &dyn PlannerModel,
    request: PromptRequest,
) -> Result<T, AiError> {
    tracing::info!(flow = request.flow, "calling planner model");
    let value = model.generate(&request).await.map_err(|e| {
        tracing::warn!(flow = request.flow, error = %e, "planner model failed");
        e
    })?;
    serde_json::from_value(value).map_err(|e| AiError::InvalidResponse {
        flow: request.flow.to_string(),
        message: e.to_string(),
    })
}

pub async fn generate_study_schedule(
    model: &dyn PlannerModel,
    input: &StudyScheduleInput,
) -> Result<StudyScheduleOutput, AiError> {
    let days = input.days_until_test.to_string();
    let request = PromptRequest {
        flow: "aiStudyOptimizerFlow",
        prompt: render(
            STUDY_OPTIMIZER_PROMPT,
            &[("daysUntilTest", days.as_str()), ("topics", input.topics.as_str())],
        ),
        output_schema: json!({
            "type": "object",
            "properties": {
                "studySchedule": { "type": "string", "description": "The generated study schedule." }
            },
            "required": ["studySchedule"]
        }),
    };
    run(model, request).await
}

pub async fn analyze_schedule(
    model: &dyn PlannerModel,
    input: &ScheduleAnalyzerInput,
) -> Result<ScheduleAnalysis, AiError> {
    let request = PromptRequest {
        flow: "scheduleAnalyzerFlow",
        prompt: render(SCHEDULE_ANALYZER_PROMPT, &[("schedule", input.schedule.as_str())]),
        output_schema: json!({
            "type": "object",
            "properties": {
                "isGood": {
                    "type": "boolean",
                    "description": "Whether the schedule is well-balanced and avoids procrastination."
                },
                "feedback": {
                    "type": "string",
                    "description": "Actionable and encouraging feedback for the student about their schedule."
                }
            },
            "required": ["isGood", "feedback"]
        }),
    };
    run(model, request).await
}

pub async fn generate_smart_goal_examples(
    model: &dyn PlannerModel,
    input: &SmartGoalInput,
) -> Result<SmartGoalExamples, AiError> {
    if input.goal.trim().is_empty() {
        return Err(AiError::InvalidInput {
            flow: "smartGoalGeneratorFlow".into(),
            message: "goal is empty".into(),
        });
    }
    let field = |description: &str| json!({ "type": "string", "description": description });
    let request = PromptRequest {
        flow: "smartGoalGeneratorFlow",
        prompt: render(SMART_GOAL_PROMPT, &[("goal", input.goal.trim())]),
        output_schema: json!({
            "type": "object",
            "properties": {
                "specific": field("An example of how to make the user's goal more specific."),
                "measurable": field("An example of how to make the user's goal measurable."),
                "achievable": field("A question or example to help the user determine if their goal is achievable."),
                "relevant": field("An example of why the goal might be relevant to the user."),
                "timeBound": field("An example of how to set a time-bound for the user's goal.")
            },
            "required": ["specific", "measurable", "achievable", "relevant", "timeBound"]
        }),
    };
    run(model, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Returns a fixed answer and remembers the last prompt.
    struct Canned {
        answer: Result<Value, ()>,
        seen: Mutex<Option<PromptRequest>>,
    }

    impl Canned {
        fn ok(answer: Value) -> Self {
            Self {
                answer: Ok(answer),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl PlannerModel for Canned {
        async fn generate(&self, request: &PromptRequest) -> Result<Value, AiError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            self.answer.clone().map_err(|()| AiError::Request("offline".into()))
        }
    }

    #[test]
    fn render_fills_every_occurrence() {
        let out = render("{{{n}}} days, {{{n}}} plans: {{{t}}}", &[("n", "3"), ("t", "fractions")]);
        assert_eq!(out, "3 days, 3 plans: fractions");
    }

    #[tokio::test]
    async fn study_flow_renders_prompt_and_parses_output() {
        let model = Canned::ok(json!({ "studySchedule": "Day 1: fractions" }));
        let input = StudyScheduleInput {
            test_date: "2026-10-22".into(),
            topics: "fractions and decimals".into(),
            days_until_test: 4,
        };
        let out = generate_study_schedule(&model, &input).await.unwrap();
        assert_eq!(out.study_schedule, "Day 1: fractions");

        let seen = model.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.flow, "aiStudyOptimizerFlow");
        assert!(seen.prompt.contains("There are 4 days until the test."));
        assert!(seen.prompt.contains("Topics: fractions and decimals"));
        assert!(!seen.prompt.contains("{{{"));
    }

    #[tokio::test]
    async fn analyzer_rejects_wrong_shape() {
        let model = Canned::ok(json!({ "isGood": "yes" }));
        let input = ScheduleAnalyzerInput { schedule: "[]".into() };
        let err = analyze_schedule(&model, &input).await.unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn analyzer_reads_camel_case() {
        let model = Canned::ok(json!({ "isGood": true, "feedback": "Nice spread!" }));
        let input = ScheduleAnalyzerInput { schedule: "[]".into() };
        let out = analyze_schedule(&model, &input).await.unwrap();
        assert!(out.is_good);
        assert_eq!(out.feedback, "Nice spread!");
    }

    #[tokio::test]
    async fn smart_goal_flow_requires_a_goal() {
        let model = Canned::ok(json!({}));
        let err = generate_smart_goal_examples(&model, &SmartGoalInput { goal: "  ".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidInput { .. }));
        assert!(model.seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn model_errors_pass_through() {
        let model = Canned {
            answer: Err(()),
            seen: Mutex::new(None),
        };
        let err = generate_smart_goal_examples(&model, &SmartGoalInput { goal: "Read more".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Request(_)));
    }
}
