//! Lesson flows driven end to end against one session's coin balance.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use timequest_core::lessons::{Prioritization, Quadrant, ReviewSource, TimeBlocking, WeeklySchedule};
use timequest_core::{
    AiError, CoreError, Event, PlacementError, PlannerModel, PromptRequest, Session, ValidationError,
};

fn session() -> Session {
    Session::new(NaiveDate::from_ymd_opt(2030, 5, 1).unwrap())
}

fn awarded(events: &[Event]) -> u32 {
    events
        .iter()
        .map(|e| match e {
            Event::CoinsAwarded { amount, .. } => *amount,
            _ => 0,
        })
        .sum()
}

struct Canned(Value);

#[async_trait]
impl PlannerModel for Canned {
    async fn generate(&self, _request: &PromptRequest) -> Result<Value, AiError> {
        Ok(self.0.clone())
    }
}

struct Offline;

#[async_trait]
impl PlannerModel for Offline {
    async fn generate(&self, _request: &PromptRequest) -> Result<Value, AiError> {
        Err(AiError::Request("connection refused".into()))
    }
}

// ============================================================================
// Weekly schedule
// ============================================================================

#[test]
fn weekly_rejects_a_run_past_nine_pm() {
    let mut lesson = WeeklySchedule::new(35);
    let err = lesson.drop_task("math-1", 0, 6).unwrap_err();
    assert!(matches!(err, CoreError::Placement(PlacementError::Overflow { .. })));
    assert_eq!(lesson.board().pool().len(), 7);
    assert!(lesson.board().grid().slot(0, 6).unwrap().is_free());
}

#[test]
fn weekly_places_a_two_hour_task_on_two_slots() {
    let mut lesson = WeeklySchedule::new(35);
    lesson.drop_task("math-1", 0, 4).unwrap();
    let grid = lesson.board().grid();
    for index in [4, 5] {
        assert_eq!(grid.slot(0, index).unwrap().task.as_ref().unwrap().id, "math-1");
    }
    assert!(grid.slot(0, 3).unwrap().is_free());
    assert!(grid.slot(0, 6).unwrap().is_free());
}

fn fill_week(lesson: &mut WeeklySchedule) {
    let plan = [
        ("math-1", 0),
        ("math-2", 1),
        ("eng-1", 2),
        ("eng-2", 3),
        ("sci-1", 4),
        ("sci-2", 5),
        ("sci-3", 6),
    ];
    for (task, day) in plan {
        lesson.drop_task(task, day, 0).unwrap();
    }
}

#[tokio::test]
async fn weekly_submit_needs_every_task_placed() {
    let mut session = session();
    let mut lesson = WeeklySchedule::new(35);
    lesson.drop_task("math-1", 0, 0).unwrap();
    let err = lesson.submit(None, &mut session.coins).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::TasksRemaining { remaining: 6 })
    ));
}

#[tokio::test]
async fn weekly_offline_review_pays_once() {
    let mut session = session();
    let mut lesson = WeeklySchedule::new(35);
    fill_week(&mut lesson);

    let events = lesson.submit(None, &mut session.coins).await.unwrap();
    assert_eq!(awarded(&events), 35);
    assert_eq!(lesson.review().unwrap().source, ReviewSource::Rules);
    assert!(lesson.is_finished());

    let again = lesson.submit(None, &mut session.coins).await.unwrap();
    assert_eq!(awarded(&again), 0);
    assert_eq!(session.coins.coins(), 35);
}

#[tokio::test]
async fn weekly_analyzer_verdict_is_used() {
    let mut session = session();
    let mut lesson = WeeklySchedule::new(35);
    fill_week(&mut lesson);
    let model = Canned(json!({ "isGood": false, "feedback": "Spread the essay out." }));

    let events = lesson.submit(Some(&model), &mut session.coins).await.unwrap();
    assert_eq!(awarded(&events), 0);
    let review = lesson.review().unwrap();
    assert_eq!(review.source, ReviewSource::Analyzer);
    assert_eq!(review.analysis.feedback, "Spread the essay out.");
}

#[tokio::test]
async fn weekly_analyzer_failure_can_be_retried() {
    let mut session = session();
    let mut lesson = WeeklySchedule::new(35);
    fill_week(&mut lesson);

    lesson.submit(Some(&Offline), &mut session.coins).await.unwrap();
    assert_eq!(lesson.review().unwrap().source, ReviewSource::Failed);
    assert!(!lesson.is_finished());

    let model = Canned(json!({ "isGood": true, "feedback": "Great plan!" }));
    let events = lesson.submit(Some(&model), &mut session.coins).await.unwrap();
    assert_eq!(awarded(&events), 35);
    assert!(lesson.is_finished());
}

// ============================================================================
// Time blocking
// ============================================================================

#[test]
fn time_blocking_work_first_afternoon_passes() {
    let mut session = session();
    let mut lesson = TimeBlocking::new(20, 5);

    let err = lesson.drop_task("t1", 2, &mut session.coins).unwrap_err();
    assert!(matches!(err, CoreError::Placement(PlacementError::Locked { .. })));

    let mut events = Vec::new();
    for (task, start) in [("t1", 4), ("t3", 8), ("t4", 10), ("t2", 11), ("t5", 12)] {
        events.extend(lesson.drop_task(task, start, &mut session.coins).unwrap());
    }
    assert!(lesson.is_finished());
    assert!(lesson.review().unwrap().passed);
    assert_eq!(awarded(&events), 20);
    assert_eq!(session.coins.coins(), 20);

    let err = lesson.unplace("t5").unwrap_err();
    assert!(matches!(err, CoreError::Placement(PlacementError::Submitted)));
}

#[test]
fn time_blocking_custom_tasks_pay_every_time() {
    let mut session = session();
    let mut lesson = TimeBlocking::new(20, 5);
    lesson.add_custom_task("Walk the dog", &mut session.coins).unwrap();
    lesson.add_custom_task("Call grandma", &mut session.coins).unwrap();
    assert!(lesson.add_custom_task("   ", &mut session.coins).unwrap().is_empty());
    assert_eq!(session.coins.coins(), 10);
    assert_eq!(lesson.board().pool().len(), 7);
}

// ============================================================================
// Prioritization
// ============================================================================

#[test]
fn prioritization_next_round_rearms_the_bonus() {
    let mut session = session();
    let mut lesson = Prioritization::new(30);
    let answers = [
        ("task-1", Quadrant::Do),
        ("task-2", Quadrant::Schedule),
        ("task-3", Quadrant::Delegate),
        ("task-4", Quadrant::Delete),
        ("task-5", Quadrant::Do),
        ("task-6", Quadrant::Schedule),
        ("task-7", Quadrant::Delegate),
        ("task-8", Quadrant::Delete),
    ];
    for (task, quadrant) in answers {
        lesson.move_task(task, Some(quadrant)).unwrap();
    }
    assert_eq!(awarded(&lesson.check(&mut session.coins).unwrap()), 30);

    lesson.next_round();
    assert_eq!(lesson.set_index(), 1);
    assert!(lesson.verdicts().is_empty());
    let events = lesson.check(&mut session.coins).unwrap();
    assert_eq!(awarded(&events), 0);
    assert_eq!(session.coins.coins(), 30);
}
