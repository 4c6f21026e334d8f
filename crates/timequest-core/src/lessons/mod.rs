//! Interactive lessons.
//!
//! Every lesson is a small state machine. Commands take the pieces of the
//! [`Session`](crate::session::Session) they touch by `&mut` and return the
//! [`Event`](crate::events::Event)s they produced; queries borrow immutably.
//! Each lesson cycles through its fixture sets and pays its completion bonus
//! at most once per round.

mod delegation;
mod focus_quest;
mod focus_runner;
mod prioritization;
mod smart_goals;
mod sorting;
mod time_blocking;
mod weekly;

pub use delegation::{Delegation, Helper, DELEGATION_MISS};
pub use focus_quest::{ClickOutcome, FocusItem, FocusQuest, ItemKind, QuestState, Scenario, SCENARIOS};
pub use focus_runner::FocusRunner;
pub use prioritization::{Prioritization, Quadrant, PRIORITIZATION_TIPS};
pub use smart_goals::{SmartGoals, SmartStep};
pub use sorting::{SortTask, SortingBoard, Verdict};
pub use time_blocking::{duration_text, TimeBlocking, TIME_BLOCKING_TIPS};
pub use weekly::{ReviewSource, ScheduleEntry, WeeklyReview, WeeklySchedule, DAYS, SCHEDULING_TIPS, TIME_SLOTS};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LessonId {
    #[serde(rename = "prioritization-power")]
    Prioritization,
    #[serde(rename = "setting-smart-goals")]
    SmartGoals,
    #[serde(rename = "mastering-time-blocking")]
    TimeBlocking,
    #[serde(rename = "creating-awesome-schedules")]
    WeeklySchedule,
    #[serde(rename = "defeating-distractions")]
    FocusQuest,
    #[serde(rename = "the-art-of-delegation")]
    Delegation,
}

/// Catalog entry shown on the lessons page.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct LessonInfo {
    pub id: LessonId,
    pub title: &'static str,
    pub description: &'static str,
}

pub static CATALOG: [LessonInfo; 6] = [
    LessonInfo {
        id: LessonId::Prioritization,
        title: "Prioritization Power",
        description: "Learn how to decide what's most important and do it first!",
    },
    LessonInfo {
        id: LessonId::SmartGoals,
        title: "Setting SMART Goals",
        description: "Turn your big dreams into small, achievable steps.",
    },
    LessonInfo {
        id: LessonId::TimeBlocking,
        title: "Mastering Time Blocking",
        description: "Create a super-powered schedule by giving every hour a job.",
    },
    LessonInfo {
        id: LessonId::WeeklySchedule,
        title: "Creating Awesome Schedules",
        description: "Build a weekly plan that includes school, fun, and free time.",
    },
    LessonInfo {
        id: LessonId::FocusQuest,
        title: "Defeating Distractions",
        description: "Discover your focus kryptonite and learn how to defeat it.",
    },
    LessonInfo {
        id: LessonId::Delegation,
        title: "The Art of Delegation",
        description: "Understand when and how to ask for help with your tasks.",
    },
];

impl LessonId {
    pub fn slug(&self) -> &'static str {
        match self {
            LessonId::Prioritization => "prioritization-power",
            LessonId::SmartGoals => "setting-smart-goals",
            LessonId::TimeBlocking => "mastering-time-blocking",
            LessonId::WeeklySchedule => "creating-awesome-schedules",
            LessonId::FocusQuest => "defeating-distractions",
            LessonId::Delegation => "the-art-of-delegation",
        }
    }

    pub fn info(&self) -> &'static LessonInfo {
        // CATALOG covers every variant.
        CATALOG.iter().find(|l| l.id == *self).unwrap_or(&CATALOG[0])
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for LessonId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .map(|l| l.id)
            .find(|id| id.slug() == s)
            .ok_or_else(|| format!("unknown lesson '{s}'"))
    }
}

/// Index of the set after `current`, wrapping around.
pub(crate) fn next_set(current: usize, sets: usize) -> usize {
    if sets == 0 {
        0
    } else {
        (current + 1) % sets
    }
}
