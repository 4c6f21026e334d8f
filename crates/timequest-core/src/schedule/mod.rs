//! Schedule types shared by the scheduling lessons.
//!
//! A [`ScheduleGrid`] is a day-major array of fixed-length [`TimeSlot`]s. A
//! [`PlacementBoard`] pairs a grid with the pool of tasks that still need a
//! home and is the only way lessons move tasks around.

mod board;
mod grid;

pub use board::{Placement, PlacementBoard};
pub use grid::{ScheduleGrid, TimeSlot};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category tag carried by every task and calendar event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    School,
    Fun,
    Chore,
}

impl TaskCategory {
    /// Anything that isn't play counts as work for ordering heuristics.
    pub fn is_work(&self) -> bool {
        !matches!(self, TaskCategory::Fun)
    }
}

impl Default for TaskCategory {
    fn default() -> Self {
        TaskCategory::School
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskCategory::School => write!(f, "school"),
            TaskCategory::Fun => write!(f, "fun"),
            TaskCategory::Chore => write!(f, "chore"),
        }
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "school" => Ok(TaskCategory::School),
            "fun" => Ok(TaskCategory::Fun),
            "chore" => Ok(TaskCategory::Chore),
            other => Err(format!("unknown category '{other}' (expected school, fun or chore)")),
        }
    }
}

/// A unit of schoolwork, chore or fun used in the scheduling exercises.
///
/// `duration` counts grid units (a half hour in time blocking, an hour in the
/// weekly planner). `deadline` is a day index, 0 = Monday.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub duration: usize,
    #[serde(default)]
    pub deadline: Option<usize>,
    #[serde(default)]
    pub category: TaskCategory,
}

impl Task {
    pub fn new(id: impl Into<String>, text: impl Into<String>, duration: usize, category: TaskCategory) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            duration,
            deadline: None,
            category,
        }
    }

    pub fn with_deadline(mut self, day: usize) -> Self {
        self.deadline = Some(day);
        self
    }
}
