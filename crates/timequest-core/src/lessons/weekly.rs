//! Creating awesome schedules: plan a week of homework before each deadline.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{next_set, LessonId};
use crate::ai::{analyze_schedule, PlannerModel, ScheduleAnalyzerInput};
use crate::error::{PlacementError, Result, ValidationError};
use crate::events::Event;
use crate::feedback::{deadline_review, ScheduleAnalysis};
use crate::schedule::{PlacementBoard, ScheduleGrid, Task, TaskCategory};
use crate::session::{CoinBalance, RewardLatch};

pub const DAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
pub const TIME_SLOTS: [&str; 7] = ["3 PM", "4 PM", "5 PM", "6 PM", "7 PM", "8 PM", "9 PM"];

pub const SCHEDULING_TIPS: [&str; 5] = [
    "Try to avoid back-to-back long sessions.",
    "Leaving gaps helps with breaks and focus.",
    "Prioritize urgent tasks closer to their deadlines.",
    "Spread tasks evenly over the week for better productivity.",
    "Remember to balance work and rest!",
];

const ANALYZER_FAILED: &str = "There was an error analyzing your schedule. Please try again.";

const SETS: [&[(&str, &str, usize, usize)]; 2] = [
    &[
        ("math-1", "Study for Math Test", 2, 2),
        ("math-2", "Study for Math Test", 2, 2),
        ("eng-1", "Write English Essay", 3, 4),
        ("eng-2", "Write English Essay", 3, 4),
        ("sci-1", "Science Project", 2, 6),
        ("sci-2", "Science Project", 2, 6),
        ("sci-3", "Science Project", 2, 6),
    ],
    &[
        ("hist-1", "History Reading", 2, 1),
        ("hist-2", "History Reading", 2, 1),
        ("art-1", "Art Project", 4, 4),
        ("art-2", "Art Project", 4, 4),
        ("book-1", "Book Report", 3, 5),
        ("book-2", "Book Report", 3, 5),
    ],
];

fn load_set(index: usize) -> PlacementBoard {
    let pool = SETS[index % SETS.len()]
        .iter()
        .map(|(id, text, duration, deadline)| {
            Task::new(*id, *text, *duration, TaskCategory::School).with_deadline(*deadline)
        })
        .collect();
    PlacementBoard::new(pool, ScheduleGrid::new(DAYS.len(), &TIME_SLOTS))
}

/// One occupied hour, in the shape sent to the schedule analyzer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub day: String,
    pub time: String,
    pub task: String,
    /// "Due Wednesday"
    pub deadline: String,
}

/// Who produced the verdict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSource {
    Analyzer,
    Rules,
    /// The analyzer call failed; the plan can be submitted again.
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyReview {
    pub analysis: ScheduleAnalysis,
    pub source: ReviewSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklySchedule {
    set_index: usize,
    board: PlacementBoard,
    review: Option<WeeklyReview>,
    latch: RewardLatch,
    reward: u32,
}

impl WeeklySchedule {
    pub fn new(reward: u32) -> Self {
        Self {
            set_index: 0,
            board: load_set(0),
            review: None,
            latch: RewardLatch::default(),
            reward,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn board(&self) -> &PlacementBoard {
        &self.board
    }

    pub fn set_index(&self) -> usize {
        self.set_index
    }

    pub fn review(&self) -> Option<&WeeklyReview> {
        self.review.as_ref()
    }

    /// True once a verdict other than a failed analyzer call is in.
    pub fn is_finished(&self) -> bool {
        self.review
            .as_ref()
            .is_some_and(|r| r.source != ReviewSource::Failed)
    }

    /// Every occupied slot in grid order.
    pub fn formatted_schedule(&self) -> Vec<ScheduleEntry> {
        let day_name = |d: usize| DAYS.get(d).copied().unwrap_or("Someday");
        self.board
            .grid()
            .slots()
            .iter()
            .filter_map(|slot| {
                slot.task.as_ref().map(|task| ScheduleEntry {
                    day: day_name(slot.day).to_string(),
                    time: slot.time.clone(),
                    task: task.text.clone(),
                    deadline: format!("Due {}", task.deadline.map(day_name).unwrap_or("Someday")),
                })
            })
            .collect()
    }

    /// [`formatted_schedule`](Self::formatted_schedule) as indented JSON text.
    pub fn schedule_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.formatted_schedule())?)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_finished() {
            return Err(PlacementError::Submitted.into());
        }
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Drop a task so it starts at hour `start` of `day`.
    pub fn drop_task(&mut self, task_id: &str, day: usize, start: usize) -> Result<Vec<Event>> {
        self.ensure_open()?;
        let placement = self.board.drop_on_slot(task_id, day, start)?;
        Ok(vec![Event::TaskPlaced {
            lesson: LessonId::WeeklySchedule,
            task_id: placement.task_id,
            day: placement.day,
            start: placement.start,
            duration: placement.duration,
            at: Utc::now(),
        }])
    }

    /// Drop a task by slot id (`d{day}-t{index}`).
    pub fn drop_on(&mut self, task_id: &str, slot_id: &str) -> Result<Vec<Event>> {
        let (day, start) = self
            .board
            .grid()
            .find_slot(slot_id)
            .map(|s| (s.day, s.index))
            .ok_or_else(|| PlacementError::UnknownSlotId(slot_id.to_string()))?;
        self.drop_task(task_id, day, start)
    }

    pub fn unplace(&mut self, task_id: &str) -> Result<Vec<Event>> {
        self.ensure_open()?;
        self.board.return_to_pool(task_id)?;
        Ok(vec![Event::TaskUnplaced {
            lesson: LessonId::WeeklySchedule,
            task_id: task_id.to_string(),
            at: Utc::now(),
        }])
    }

    /// Ask for a verdict on the finished week.
    ///
    /// Every task must be placed first. With a model the formatted week is
    /// sent to the schedule analyzer; without one the offline deadline rules
    /// decide. A good plan pays once. Submitting a finished plan again only
    /// repeats the verdict.
    pub async fn submit(
        &mut self,
        model: Option<&dyn PlannerModel>,
        coins: &mut CoinBalance,
    ) -> Result<Vec<Event>> {
        if let Some(review) = self.review.as_ref().filter(|_| self.is_finished()) {
            return Ok(vec![Event::LessonFinished {
                lesson: LessonId::WeeklySchedule,
                passed: review.analysis.is_good,
                message: review.analysis.feedback.clone(),
                at: Utc::now(),
            }]);
        }
        if !self.board.is_pool_empty() {
            return Err(ValidationError::TasksRemaining {
                remaining: self.board.pool().len(),
            }
            .into());
        }

        let review = match model {
            Some(model) => {
                let input = ScheduleAnalyzerInput {
                    schedule: self.schedule_json()?,
                };
                match analyze_schedule(model, &input).await {
                    Ok(analysis) => WeeklyReview {
                        analysis,
                        source: ReviewSource::Analyzer,
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "schedule analysis failed");
                        WeeklyReview {
                            analysis: ScheduleAnalysis {
                                is_good: false,
                                feedback: ANALYZER_FAILED.to_string(),
                            },
                            source: ReviewSource::Failed,
                        }
                    }
                }
            }
            None => WeeklyReview {
                analysis: deadline_review(self.board.grid(), &DAYS),
                source: ReviewSource::Rules,
            },
        };

        let passed = review.analysis.is_good;
        let mut events = vec![Event::LessonFinished {
            lesson: LessonId::WeeklySchedule,
            passed,
            message: review.analysis.feedback.clone(),
            at: Utc::now(),
        }];
        if passed {
            events.extend(self.latch.claim(LessonId::WeeklySchedule, self.reward, coins));
        }
        self.review = Some(review);
        Ok(events)
    }

    /// Start again with the next task set on an empty week.
    pub fn next_round(&mut self) -> Vec<Event> {
        self.set_index = next_set(self.set_index, SETS.len());
        self.board = load_set(self.set_index);
        self.review = None;
        self.latch.reset();
        vec![Event::RoundStarted {
            lesson: LessonId::WeeklySchedule,
            set_index: self.set_index,
            at: Utc::now(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::PromptRequest;
    use crate::error::AiError;
    use crate::CoreError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Analyzer {
        answer: std::result::Result<Value, String>,
        seen: Mutex<Option<String>>,
        calls: AtomicUsize,
    }

    impl Analyzer {
        fn new(answer: std::result::Result<Value, String>) -> Self {
            Self {
                answer,
                seen: Mutex::new(None),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PlannerModel for Analyzer {
        async fn generate(&self, request: &PromptRequest) -> std::result::Result<Value, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some(request.prompt.clone());
            self.answer.clone().map_err(AiError::Request)
        }
    }

    /// Spread every first-set task out before its deadline.
    fn plan_early(week: &mut WeeklySchedule) {
        for (id, day, start) in [
            ("math-1", 0, 0),
            ("math-2", 1, 0),
            ("eng-1", 2, 0),
            ("eng-2", 3, 0),
            ("sci-1", 4, 0),
            ("sci-2", 5, 0),
            ("sci-3", 6, 0),
        ] {
            week.drop_task(id, day, start).unwrap();
        }
    }

    #[test]
    fn last_hour_rejects_two_hour_task() {
        let mut week = WeeklySchedule::new(35);
        let before = week.clone();
        let err = week.drop_task("math-1", 0, 6).unwrap_err();
        assert_eq!(err.to_string(), "Not enough time in the schedule for this task here!");
        assert_eq!(week, before);
    }

    #[test]
    fn drop_by_slot_id() {
        let mut week = WeeklySchedule::new(35);
        week.drop_on("math-1", "d3-t4").unwrap();
        assert_eq!(week.board().grid().position_of("math-1"), Some((3, 4)));
        assert!(week.drop_on("math-2", "d9-t0").is_err());
    }

    #[test]
    fn formatted_schedule_lists_every_occupied_hour() {
        let mut week = WeeklySchedule::new(35);
        week.drop_task("math-1", 1, 2).unwrap();
        let entries = week.formatted_schedule();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            ScheduleEntry {
                day: "Tuesday".into(),
                time: "5 PM".into(),
                task: "Study for Math Test".into(),
                deadline: "Due Wednesday".into(),
            }
        );
        assert_eq!(entries[1].time, "6 PM");
        assert!(week.schedule_json().unwrap().contains("\n  {"));
    }

    #[tokio::test]
    async fn submit_requires_empty_pool() {
        let mut coins = CoinBalance::new();
        let mut week = WeeklySchedule::new(35);
        let err = week.submit(None, &mut coins).await.unwrap_err();
        assert_eq!(err.to_string(), "You still have tasks to schedule!");
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TasksRemaining { remaining: 7 })
        ));
    }

    #[tokio::test]
    async fn offline_review_pays_once() {
        let mut coins = CoinBalance::new();
        let mut week = WeeklySchedule::new(35);
        plan_early(&mut week);

        let events = week.submit(None, &mut coins).await.unwrap();
        assert_eq!(Event::coins_in(&events), 35);
        let review = week.review().unwrap();
        assert_eq!(review.source, ReviewSource::Rules);
        assert!(review.analysis.is_good);

        let again = week.submit(None, &mut coins).await.unwrap();
        assert_eq!(Event::coins_in(&again), 0);
        assert_eq!(coins.coins(), 35);
        assert!(week.unplace("math-1").is_err());
    }

    #[tokio::test]
    async fn late_task_fails_offline_review() {
        let mut coins = CoinBalance::new();
        let mut week = WeeklySchedule::new(35);
        plan_early(&mut week);
        week.drop_task("math-2", 4, 3).unwrap();

        week.submit(None, &mut coins).await.unwrap();
        let review = week.review().unwrap();
        assert!(!review.analysis.is_good);
        assert!(review.analysis.feedback.contains("scheduled on Friday but it's due Wednesday"));
        assert_eq!(coins.coins(), 0);
    }

    #[tokio::test]
    async fn analyzer_verdict_is_used() {
        let mut coins = CoinBalance::new();
        let mut week = WeeklySchedule::new(35);
        plan_early(&mut week);
        let model = Analyzer::new(Ok(json!({ "isGood": true, "feedback": "Lovely week!" })));

        let events = week.submit(Some(&model), &mut coins).await.unwrap();
        assert_eq!(Event::coins_in(&events), 35);
        assert_eq!(week.review().unwrap().analysis.feedback, "Lovely week!");
        let prompt = model.seen.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("\"deadline\": \"Due Wednesday\""));
    }

    #[tokio::test]
    async fn resubmitting_a_finished_plan_skips_the_analyzer() {
        let mut coins = CoinBalance::new();
        let mut week = WeeklySchedule::new(35);
        plan_early(&mut week);
        let model = Analyzer::new(Ok(json!({ "isGood": true, "feedback": "Lovely week!" })));

        week.submit(Some(&model), &mut coins).await.unwrap();
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);

        let again = week.submit(Some(&model), &mut coins).await.unwrap();
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(Event::coins_in(&again), 0);
        assert!(matches!(
            again.as_slice(),
            [Event::LessonFinished { passed: true, message, .. }] if message == "Lovely week!"
        ));
        assert_eq!(coins.coins(), 35);
    }

    #[tokio::test]
    async fn analyzer_failure_can_be_retried() {
        let mut coins = CoinBalance::new();
        let mut week = WeeklySchedule::new(35);
        plan_early(&mut week);

        let broken = Analyzer::new(Err("timeout".into()));
        week.submit(Some(&broken), &mut coins).await.unwrap();
        let review = week.review().unwrap();
        assert_eq!(review.source, ReviewSource::Failed);
        assert_eq!(review.analysis.feedback, ANALYZER_FAILED);
        assert!(!week.is_finished());

        let good = Analyzer::new(Ok(json!({ "isGood": true, "feedback": "Nice" })));
        week.submit(Some(&good), &mut coins).await.unwrap();
        assert!(week.is_finished());
        assert_eq!(coins.coins(), 35);
    }

    #[test]
    fn next_round_swaps_sets() {
        let mut week = WeeklySchedule::new(35);
        week.next_round();
        assert_eq!(week.board().pool()[0].id, "hist-1");
        assert_eq!(week.board().pool()[0].deadline, Some(1));
        assert_eq!(week.board().grid().free_slots(), 49);
    }
}
