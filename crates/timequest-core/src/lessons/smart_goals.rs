//! Setting SMART goals: a step-by-step wizard from a big goal to a summary.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::LessonId;
use crate::ai::{generate_smart_goal_examples, PlannerModel, SmartGoalInput};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::session::{CoinBalance, RewardLatch};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SmartStep {
    #[serde(rename = "intro")]
    Intro,
    #[serde(rename = "S")]
    Specific,
    #[serde(rename = "M")]
    Measurable,
    #[serde(rename = "A")]
    Achievable,
    #[serde(rename = "R")]
    Relevant,
    #[serde(rename = "T")]
    TimeBound,
    #[serde(rename = "summary")]
    Summary,
}

impl SmartStep {
    /// Question steps, in order. [`SmartStep::Summary`] follows the last one.
    pub const QUESTIONS: [SmartStep; 6] = [
        SmartStep::Intro,
        SmartStep::Specific,
        SmartStep::Measurable,
        SmartStep::Achievable,
        SmartStep::Relevant,
        SmartStep::TimeBound,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SmartStep::Intro => "Your Big Goal",
            SmartStep::Specific => "Specific",
            SmartStep::Measurable => "Measurable",
            SmartStep::Achievable => "Achievable",
            SmartStep::Relevant => "Relevant",
            SmartStep::TimeBound => "Time-Bound",
            SmartStep::Summary => "Your SMART Goal",
        }
    }

    pub fn question(&self) -> &'static str {
        match self {
            SmartStep::Intro => "What is a big goal you want to achieve?",
            SmartStep::Specific => "How can you make your goal clear and specific?",
            SmartStep::Measurable => "How will you measure your success?",
            SmartStep::Achievable => "Is this goal realistic right now?",
            SmartStep::Relevant => "Why is this goal important to you?",
            SmartStep::TimeBound => "What is your deadline?",
            SmartStep::Summary => "",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SmartStep::Intro => "Let's start with your main mission! What do you want to accomplish?",
            SmartStep::Specific => "Be precise: what exactly will you do?",
            SmartStep::Measurable => "Choose numbers or milestones to track.",
            SmartStep::Achievable => "Check if you have the tools and time.",
            SmartStep::Relevant => "Connect it to what matters most.",
            SmartStep::TimeBound => "Set a clear finish line.",
            SmartStep::Summary => "",
        }
    }

    /// Example answer shown before the student types anything.
    pub fn default_placeholder(&self) -> &'static str {
        match self {
            SmartStep::Intro => "e.g., Learn basic coding by building a simple game",
            SmartStep::Specific => "e.g., I will build a small JavaScript game that responds to clicks",
            SmartStep::Measurable => "e.g., I will complete one coding lesson per day for 10 days",
            SmartStep::Achievable => "e.g., I can spend 30 minutes after school and have access to tutorials",
            SmartStep::Relevant => "e.g., It helps me improve problem-solving and creativity",
            SmartStep::TimeBound => "e.g., I will finish by the end of this month",
            SmartStep::Summary => "",
        }
    }

    /// Label used on the summary card.
    pub fn summary_label(&self) -> &'static str {
        match self {
            SmartStep::Intro => "Goal",
            SmartStep::TimeBound => "Time-bound",
            other => other.title(),
        }
    }
}

fn default_placeholders() -> BTreeMap<SmartStep, String> {
    SmartStep::QUESTIONS
        .iter()
        .map(|s| (*s, s.default_placeholder().to_string()))
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SmartGoals {
    /// Index into [`SmartStep::QUESTIONS`]; equal to its length on the summary.
    step_index: usize,
    answers: BTreeMap<SmartStep, String>,
    placeholders: BTreeMap<SmartStep, String>,
    latch: RewardLatch,
    reward: u32,
}

impl SmartGoals {
    pub fn new(reward: u32) -> Self {
        Self {
            step_index: 0,
            answers: BTreeMap::new(),
            placeholders: default_placeholders(),
            latch: RewardLatch::default(),
            reward,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn step(&self) -> SmartStep {
        SmartStep::QUESTIONS
            .get(self.step_index)
            .copied()
            .unwrap_or(SmartStep::Summary)
    }

    pub fn is_summary(&self) -> bool {
        self.step() == SmartStep::Summary
    }

    /// Percent of the wizard completed.
    pub fn progress(&self) -> u32 {
        (self.step_index * 100 / SmartStep::QUESTIONS.len()) as u32
    }

    pub fn answer_for(&self, step: SmartStep) -> &str {
        self.answers.get(&step).map(String::as_str).unwrap_or("")
    }

    pub fn placeholder(&self, step: SmartStep) -> &str {
        self.placeholders.get(&step).map(String::as_str).unwrap_or("")
    }

    /// `(label, answer)` rows for the summary card.
    pub fn summary(&self) -> Vec<(&'static str, &str)> {
        SmartStep::QUESTIONS
            .iter()
            .map(|s| (s.summary_label(), self.answer_for(*s)))
            .collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record the answer for the current step.
    pub fn answer(&mut self, text: &str) -> Result<()> {
        if self.is_summary() {
            return Err(ValidationError::InvalidValue {
                field: "answer".into(),
                message: "this goal is finished; start again to build another".into(),
            }
            .into());
        }
        self.answers.insert(self.step(), text.to_string());
        Ok(())
    }

    /// Move to the next step. The current answer must not be blank.
    ///
    /// Leaving the intro asks `model` (when there is one) for examples
    /// tailored to the goal; any failure falls back to the defaults.
    /// Reaching the summary pays the bonus once.
    pub async fn next(
        &mut self,
        model: Option<&dyn PlannerModel>,
        coins: &mut CoinBalance,
    ) -> Result<Vec<Event>> {
        if self.is_summary() {
            return Ok(Vec::new());
        }
        let step = self.step();
        let answer = self.answer_for(step).trim().to_string();
        if answer.is_empty() {
            return Err(ValidationError::EmptyAnswer.into());
        }

        if step == SmartStep::Intro {
            self.placeholders = match model {
                Some(model) => self.tailored_placeholders(model, &answer).await,
                None => default_placeholders(),
            };
        }

        self.step_index += 1;
        let mut events = Vec::new();
        if self.is_summary() {
            events.push(Event::LessonFinished {
                lesson: LessonId::SmartGoals,
                passed: true,
                message: format!("+{} Coins!", self.reward),
                at: Utc::now(),
            });
            events.extend(self.latch.claim(LessonId::SmartGoals, self.reward, coins));
        }
        Ok(events)
    }

    async fn tailored_placeholders(
        &self,
        model: &dyn PlannerModel,
        goal: &str,
    ) -> BTreeMap<SmartStep, String> {
        let input = SmartGoalInput {
            goal: goal.to_string(),
        };
        match generate_smart_goal_examples(model, &input).await {
            Ok(ex) => {
                let mut out = default_placeholders();
                for (step, text) in [
                    (SmartStep::Specific, ex.specific),
                    (SmartStep::Measurable, ex.measurable),
                    (SmartStep::Achievable, ex.achievable),
                    (SmartStep::Relevant, ex.relevant),
                    (SmartStep::TimeBound, ex.time_bound),
                ] {
                    out.insert(step, format!("e.g., {text}"));
                }
                out
            }
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default SMART examples");
                default_placeholders()
            }
        }
    }

    pub fn back(&mut self) {
        self.step_index = self.step_index.saturating_sub(1);
    }

    /// Clear everything and re-arm the bonus.
    pub fn reset(&mut self) -> Vec<Event> {
        self.step_index = 0;
        self.answers.clear();
        self.placeholders = default_placeholders();
        self.latch.reset();
        vec![Event::RoundStarted {
            lesson: LessonId::SmartGoals,
            set_index: 0,
            at: Utc::now(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::PromptRequest;
    use crate::error::AiError;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct Examples;

    #[async_trait]
    impl PlannerModel for Examples {
        async fn generate(&self, _request: &PromptRequest) -> std::result::Result<Value, AiError> {
            Ok(json!({
                "specific": "Read three chapter books",
                "measurable": "Log pages every night",
                "achievable": "Do you have 20 minutes a day?",
                "relevant": "Reading makes stories come alive",
                "timeBound": "Finish by winter break"
            }))
        }
    }

    struct Broken;

    #[async_trait]
    impl PlannerModel for Broken {
        async fn generate(&self, _request: &PromptRequest) -> std::result::Result<Value, AiError> {
            Err(AiError::Request("offline".into()))
        }
    }

    async fn finish(goals: &mut SmartGoals, coins: &mut CoinBalance) {
        while !goals.is_summary() {
            goals.answer("something").unwrap();
            goals.next(None, coins).await.unwrap();
        }
    }

    #[tokio::test]
    async fn blank_answer_blocks_next() {
        let mut coins = CoinBalance::new();
        let mut goals = SmartGoals::new(50);
        goals.answer("   ").unwrap();
        let err = goals.next(None, &mut coins).await.unwrap_err();
        assert_eq!(err.to_string(), "Please write an answer before moving on.");
        assert_eq!(goals.step(), SmartStep::Intro);
    }

    #[tokio::test]
    async fn model_examples_become_placeholders() {
        let mut coins = CoinBalance::new();
        let mut goals = SmartGoals::new(50);
        goals.answer("Read more books").unwrap();
        goals.next(Some(&Examples), &mut coins).await.unwrap();
        assert_eq!(goals.step(), SmartStep::Specific);
        assert_eq!(goals.placeholder(SmartStep::Specific), "e.g., Read three chapter books");
        assert_eq!(goals.placeholder(SmartStep::TimeBound), "e.g., Finish by winter break");
        assert_eq!(
            goals.placeholder(SmartStep::Intro),
            SmartStep::Intro.default_placeholder()
        );
    }

    #[tokio::test]
    async fn model_failure_keeps_defaults() {
        let mut coins = CoinBalance::new();
        let mut goals = SmartGoals::new(50);
        goals.answer("Read more books").unwrap();
        goals.next(Some(&Broken), &mut coins).await.unwrap();
        assert_eq!(
            goals.placeholder(SmartStep::Specific),
            SmartStep::Specific.default_placeholder()
        );
    }

    #[tokio::test]
    async fn summary_pays_once_until_reset() {
        let mut coins = CoinBalance::new();
        let mut goals = SmartGoals::new(50);
        finish(&mut goals, &mut coins).await;
        assert_eq!(coins.coins(), 50);
        assert_eq!(goals.progress(), 100);
        assert_eq!(goals.summary()[0], ("Goal", "something"));

        goals.back();
        assert_eq!(goals.step(), SmartStep::TimeBound);
        goals.next(None, &mut coins).await.unwrap();
        assert_eq!(coins.coins(), 50);

        goals.reset();
        assert_eq!(goals.step(), SmartStep::Intro);
        assert_eq!(goals.answer_for(SmartStep::Intro), "");
        finish(&mut goals, &mut coins).await;
        assert_eq!(coins.coins(), 100);
    }

    #[test]
    fn cannot_answer_on_summary() {
        let mut goals = SmartGoals::new(50);
        goals.step_index = SmartStep::QUESTIONS.len();
        assert!(goals.answer("late").is_err());
    }
}
