use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lessons::LessonId;

/// Every state change a lesson makes produces an Event.
/// The CLI prints them; a GUI would animate them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Event {
    TaskPlaced {
        lesson: LessonId,
        task_id: String,
        day: usize,
        start: usize,
        duration: usize,
        at: DateTime<Utc>,
    },
    TaskUnplaced {
        lesson: LessonId,
        task_id: String,
        at: DateTime<Utc>,
    },
    /// A card was dropped into a named bin (quadrant or helper).
    TaskSorted {
        lesson: LessonId,
        task_id: String,
        bin: String,
        at: DateTime<Utc>,
    },
    TaskAdded {
        lesson: LessonId,
        task_id: String,
        text: String,
        at: DateTime<Utc>,
    },
    LessonFinished {
        lesson: LessonId,
        passed: bool,
        message: String,
        at: DateTime<Utc>,
    },
    CoinsAwarded {
        lesson: LessonId,
        amount: u32,
        balance: u64,
        at: DateTime<Utc>,
    },
    RoundStarted {
        lesson: LessonId,
        set_index: usize,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn lesson(&self) -> LessonId {
        match self {
            Event::TaskPlaced { lesson, .. }
            | Event::TaskUnplaced { lesson, .. }
            | Event::TaskSorted { lesson, .. }
            | Event::TaskAdded { lesson, .. }
            | Event::LessonFinished { lesson, .. }
            | Event::CoinsAwarded { lesson, .. }
            | Event::RoundStarted { lesson, .. } => *lesson,
        }
    }

    /// Total coins paid out by a batch of events.
    pub fn coins_in(events: &[Event]) -> u32 {
        events
            .iter()
            .map(|e| match e {
                Event::CoinsAwarded { amount, .. } => *amount,
                _ => 0,
            })
            .sum()
    }
}
