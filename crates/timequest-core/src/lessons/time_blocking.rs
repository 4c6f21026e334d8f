//! Mastering time blocking: fill one afternoon, half an hour at a time.
//!
//! The board is a single day of sixteen half-hour slots from 3:00 PM with two
//! fixed blocks. Pool and grid can be saved per calendar date.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{next_set, LessonId};
use crate::error::{PlacementError, Result};
use crate::events::Event;
use crate::feedback::{work_before_fun, Review};
use crate::schedule::{PlacementBoard, ScheduleGrid, Task, TaskCategory};
use crate::session::{CoinBalance, RewardLatch};
use crate::storage::Database;

const SLOTS: usize = 16;

pub const TIME_BLOCKING_TIPS: [&str; 5] = [
    "Do the hardest task first while you're fresh.",
    "Schedule 5-min break between blocks.",
    "Color-code tasks for quick spotting.",
    "Mix chores and study to stay motivated.",
    "Celebrate small wins with a sticker!",
];

const SETS: [&[(&str, &str, usize, TaskCategory)]; 2] = [
    &[
        ("t1", "Math Homework", 2, TaskCategory::School),
        ("t2", "Read a Book", 1, TaskCategory::Fun),
        ("t3", "Science Quiz", 2, TaskCategory::School),
        ("t4", "Tidy Room", 1, TaskCategory::Chore),
        ("t5", "Practice Piano", 2, TaskCategory::Fun),
    ],
    &[
        ("t6", "English Essay", 2, TaskCategory::School),
        ("t7", "Garden Water", 1, TaskCategory::Chore),
        ("t8", "Sketch Drawing", 1, TaskCategory::Fun),
        ("t9", "History Reading", 2, TaskCategory::School),
    ],
];

/// "3:00 PM", "3:30 PM", ... "10:30 PM".
fn slot_label(index: usize) -> String {
    let minutes = 15 * 60 + index * 30;
    let (hour, minute) = (minutes / 60, minutes % 60);
    let display = (hour + 11) % 12 + 1;
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    format!("{display}:{minute:02} {meridiem}")
}

fn fixed_afternoon() -> ScheduleGrid {
    let labels: Vec<String> = (0..SLOTS).map(slot_label).collect();
    let mut grid = ScheduleGrid::new(1, &labels);
    let class = grid.lock(0, 0, Task::new("l1", "Science Class", 4, TaskCategory::School));
    let dinner = grid.lock(0, 6, Task::new("l2", "Dinner", 2, TaskCategory::Chore));
    debug_assert!(class.is_ok() && dinner.is_ok());
    grid
}

fn fixture_pool(index: usize) -> Vec<Task> {
    SETS[index % SETS.len()]
        .iter()
        .map(|(id, text, duration, category)| Task::new(*id, *text, *duration, *category))
        .collect()
}

/// Duration in half-hour units as "30m", "1h" or "1h 30m".
pub fn duration_text(units: usize) -> String {
    let (hours, minutes) = (units / 2, (units % 2) * 30);
    match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

fn tasks_key(date: NaiveDate) -> String {
    format!("tasks-{}", date.format("%Y-%m-%d"))
}

fn sched_key(date: NaiveDate) -> String {
    format!("sched-{}", date.format("%Y-%m-%d"))
}

fn done_key(date: NaiveDate) -> String {
    format!("done-{}", date.format("%Y-%m-%d"))
}

/// Verdict and bonus state saved next to a date's board.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Outcome {
    review: Option<Review>,
    latch: RewardLatch,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeBlocking {
    set_index: usize,
    board: PlacementBoard,
    review: Option<Review>,
    latch: RewardLatch,
    reward: u32,
    custom_reward: u32,
}

impl TimeBlocking {
    /// `reward` is the completion bonus, `custom_reward` is paid per custom task.
    pub fn new(reward: u32, custom_reward: u32) -> Self {
        Self {
            set_index: 0,
            board: PlacementBoard::new(fixture_pool(0), fixed_afternoon()),
            review: None,
            latch: RewardLatch::default(),
            reward,
            custom_reward,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn board(&self) -> &PlacementBoard {
        &self.board
    }

    pub fn set_index(&self) -> usize {
        self.set_index
    }

    /// Feedback from the finished plan.
    pub fn review(&self) -> Option<&Review> {
        self.review.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.review.is_some()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_finished() {
            return Err(PlacementError::Submitted.into());
        }
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Add a half-hour fun task to the pool and pay the creation bonus.
    /// Blank text is ignored.
    pub fn add_custom_task(&mut self, text: &str, coins: &mut CoinBalance) -> Result<Vec<Event>> {
        self.ensure_open()?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let task = Task::new(format!("custom-{}", Uuid::new_v4()), text, 1, TaskCategory::Fun);
        let at = Utc::now();
        let lesson = LessonId::TimeBlocking;
        let mut events = vec![Event::TaskAdded {
            lesson,
            task_id: task.id.clone(),
            text: task.text.clone(),
            at,
        }];
        self.board.push(task);

        if self.custom_reward > 0 {
            let balance = coins.add(self.custom_reward);
            tracing::info!(amount = self.custom_reward, balance, "custom task bonus");
            events.push(Event::CoinsAwarded {
                lesson,
                amount: self.custom_reward,
                balance,
                at,
            });
        }
        Ok(events)
    }

    /// Drop a task so it starts at slot `start`. Finishes the lesson once
    /// nothing is left to place or no free slot remains.
    pub fn drop_task(&mut self, task_id: &str, start: usize, coins: &mut CoinBalance) -> Result<Vec<Event>> {
        self.ensure_open()?;
        let placement = self.board.drop_on_slot(task_id, 0, start)?;
        let mut events = vec![Event::TaskPlaced {
            lesson: LessonId::TimeBlocking,
            task_id: placement.task_id,
            day: placement.day,
            start: placement.start,
            duration: placement.duration,
            at: Utc::now(),
        }];

        if self.board.is_pool_empty() || self.board.grid().free_slots() == 0 {
            let review = work_before_fun(self.board.grid());
            tracing::debug!(passed = review.passed, "time blocking finished");
            events.push(Event::LessonFinished {
                lesson: LessonId::TimeBlocking,
                passed: review.passed,
                message: review.message.clone(),
                at: Utc::now(),
            });
            events.extend(self.latch.claim(LessonId::TimeBlocking, self.reward, coins));
            self.review = Some(review);
        }
        Ok(events)
    }

    /// Send a placed task back to the pool.
    pub fn unplace(&mut self, task_id: &str) -> Result<Vec<Event>> {
        self.ensure_open()?;
        self.board.return_to_pool(task_id)?;
        Ok(vec![Event::TaskUnplaced {
            lesson: LessonId::TimeBlocking,
            task_id: task_id.to_string(),
            at: Utc::now(),
        }])
    }

    /// Start again with the next task set on a fresh afternoon.
    pub fn next_round(&mut self) -> Vec<Event> {
        self.set_index = next_set(self.set_index, SETS.len());
        self.board = PlacementBoard::new(fixture_pool(self.set_index), fixed_afternoon());
        self.review = None;
        self.latch.reset();
        vec![Event::RoundStarted {
            lesson: LessonId::TimeBlocking,
            set_index: self.set_index,
            at: Utc::now(),
        }]
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Store the pool and grid under the keys for `date`.
    pub fn save(&self, db: &Database, date: NaiveDate) -> Result<()> {
        db.set_json(&tasks_key(date), &self.board.pool())?;
        db.set_json(&sched_key(date), self.board.grid())?;
        let outcome = Outcome {
            review: self.review.clone(),
            latch: self.latch,
        };
        db.set_json(&done_key(date), &outcome)?;
        Ok(())
    }

    /// Switch to `date`: restore whatever was saved for it, falling back to
    /// the current set and an empty afternoon. A date finished earlier stays
    /// finished and its bonus stays claimed.
    pub fn load(&mut self, db: &Database, date: NaiveDate) -> Result<()> {
        let pool: Option<Vec<Task>> = db.get_json(&tasks_key(date))?;
        let grid: Option<ScheduleGrid> = db.get_json(&sched_key(date))?;
        tracing::debug!(%date, saved_pool = pool.is_some(), saved_grid = grid.is_some(), "time blocking loaded");
        self.board = PlacementBoard::new(
            pool.unwrap_or_else(|| fixture_pool(self.set_index)),
            grid.unwrap_or_else(fixed_afternoon),
        );
        let outcome: Outcome = db.get_json(&done_key(date))?.unwrap_or_default();
        self.review = outcome.review;
        self.latch = outcome.latch;
        Ok(())
    }
}
