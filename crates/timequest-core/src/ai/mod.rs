//! Prompt flows routed to an external hosted model.
//!
//! The crate never runs a model itself. Each flow renders a fixed prompt,
//! attaches the JSON shape it expects back, hands both to a [`PlannerModel`]
//! and checks that what comes back has that shape.

mod client;
mod flows;
mod study;

pub use client::HttpPlanner;
pub use flows::{
    analyze_schedule, generate_smart_goal_examples, generate_study_schedule, ScheduleAnalyzerInput,
    SmartGoalExamples, SmartGoalInput, StudyScheduleInput, StudyScheduleOutput,
};
pub use study::{create_study_plan, StudyForm, StudyPlanOutcome, STUDY_PLAN_FAILED};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::AiError;

/// One rendered prompt plus the JSON shape the answer must take.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PromptRequest {
    /// Flow name, used in logs and error messages.
    pub flow: &'static str,
    pub prompt: String,
    /// JSON Schema of the expected object.
    pub output_schema: Value,
}

/// Anything that can turn a prompt into a JSON object.
///
/// [`HttpPlanner`] talks to an OpenAI-compatible endpoint; tests plug in
/// canned answers.
#[async_trait]
pub trait PlannerModel: Send + Sync {
    async fn generate(&self, request: &PromptRequest) -> Result<Value, AiError>;
}
