//! Prioritization power: sort tasks into the four Eisenhower quadrants.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::sorting::{SortTask, SortingBoard, Verdict};
use super::{next_set, LessonId};
use crate::error::{PlacementError, Result};
use crate::events::Event;
use crate::session::{CoinBalance, RewardLatch};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    Do,
    Schedule,
    Delegate,
    Delete,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Do, Quadrant::Schedule, Quadrant::Delegate, Quadrant::Delete];

    pub fn title(&self) -> &'static str {
        match self {
            Quadrant::Do => "Do Now",
            Quadrant::Schedule => "Plan It",
            Quadrant::Delegate => "Ask for Help",
            Quadrant::Delete => "Drop It",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Quadrant::Do => "Urgent & Important",
            Quadrant::Schedule => "Not Urgent & Important",
            Quadrant::Delegate => "Urgent & Not Important",
            Quadrant::Delete => "Not Urgent & Not Important",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Quadrant::Do => "do",
            Quadrant::Schedule => "schedule",
            Quadrant::Delegate => "delegate",
            Quadrant::Delete => "delete",
        };
        f.write_str(s)
    }
}

impl FromStr for Quadrant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Quadrant::ALL
            .into_iter()
            .find(|q| q.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown quadrant '{s}' (expected do, schedule, delegate or delete)"))
    }
}

const SETS: [&[(&str, &str, Quadrant)]; 2] = [
    &[
        ("task-1", "Math homework due tomorrow", Quadrant::Do),
        ("task-2", "Start science fair project due in 2 weeks", Quadrant::Schedule),
        ("task-3", "Reply to your friend's text about the weekend", Quadrant::Delegate),
        ("task-4", "Watch a new episode of your favorite cartoon", Quadrant::Delete),
        ("task-5", "Study for the history quiz on Friday", Quadrant::Do),
        ("task-6", "Plan your birthday party for next month", Quadrant::Schedule),
        ("task-7", "Take out the recycling bin because it's full", Quadrant::Delegate),
        ("task-8", "Scroll through social media for 15 minutes", Quadrant::Delete),
    ],
    &[
        ("task-a", "Finish English reading assignment due tomorrow", Quadrant::Do),
        ("task-b", "Research summer camp options", Quadrant::Schedule),
        ("task-c", "Ask mom to help buy a birthday gift for a friend", Quadrant::Delegate),
        ("task-d", "Daydream about what you want for your birthday", Quadrant::Delete),
        ("task-e", "Pack your backpack for school tomorrow", Quadrant::Do),
        ("task-f", "Decide what movie to watch on Friday night", Quadrant::Schedule),
        ("task-g", "Remind your dad about your soccer game on Saturday", Quadrant::Delegate),
        ("task-h", "Check if you have any new likes on your game profile", Quadrant::Delete),
    ],
];

pub const PRIORITIZATION_TIPS: [&str; 5] = [
    "Write down all tasks before sorting.",
    "Use a timer: spend 2 minutes on each urgent item.",
    "Ask: \"Will this matter tomorrow?\" for importance.",
    "Break big tasks into smaller, actionable steps.",
    "Color-code by quadrant to see urgency at a glance.",
];

fn load_set(index: usize) -> SortingBoard<Quadrant> {
    let tasks = SETS[index % SETS.len()]
        .iter()
        .map(|(id, text, q)| SortTask::new(id, text, *q))
        .collect();
    SortingBoard::new(tasks)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prioritization {
    set_index: usize,
    board: SortingBoard<Quadrant>,
    verdicts: Vec<Verdict>,
    latch: RewardLatch,
    reward: u32,
}

impl Prioritization {
    pub fn new(reward: u32) -> Self {
        Self {
            set_index: 0,
            board: load_set(0),
            verdicts: Vec::new(),
            latch: RewardLatch::default(),
            reward,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn board(&self) -> &SortingBoard<Quadrant> {
        &self.board
    }

    pub fn set_index(&self) -> usize {
        self.set_index
    }

    /// Results of the last check; empty until checked.
    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn is_all_correct(&self) -> bool {
        self.board.is_submitted() && self.latch.is_claimed()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Move a task into a quadrant, or back to the task list with `None`.
    pub fn move_task(&mut self, task_id: &str, to: Option<Quadrant>) -> Result<Vec<Event>> {
        self.board.move_to(task_id, to)?;
        let at = Utc::now();
        let lesson = LessonId::Prioritization;
        Ok(vec![match to {
            Some(q) => {
                tracing::debug!(task = task_id, quadrant = %q, "task sorted");
                Event::TaskSorted {
                    lesson,
                    task_id: task_id.to_string(),
                    bin: q.to_string(),
                    at,
                }
            }
            None => Event::TaskUnplaced {
                lesson,
                task_id: task_id.to_string(),
                at,
            },
        }])
    }

    /// Grade every sorted task. Pays the bonus once if every task is sorted
    /// and every one is right.
    pub fn check(&mut self, coins: &mut CoinBalance) -> Result<Vec<Event>> {
        if self.board.is_submitted() {
            return Err(PlacementError::Submitted.into());
        }
        self.verdicts = self.board.grade(None);
        let passed = self.board.all_placed() && self.verdicts.iter().all(|v| v.correct);
        let message = if passed {
            format!("You earned +{} Coins!", self.reward)
        } else {
            "Review and try again to master it!".to_string()
        };

        let mut events = vec![Event::LessonFinished {
            lesson: LessonId::Prioritization,
            passed,
            message,
            at: Utc::now(),
        }];
        if passed {
            events.extend(self.latch.claim(LessonId::Prioritization, self.reward, coins));
        }
        Ok(events)
    }

    /// Start again with the next task set.
    pub fn next_round(&mut self) -> Vec<Event> {
        self.set_index = next_set(self.set_index, SETS.len());
        self.board = load_set(self.set_index);
        self.verdicts.clear();
        self.latch.reset();
        vec![Event::RoundStarted {
            lesson: LessonId::Prioritization,
            set_index: self.set_index,
            at: Utc::now(),
        }]
    }
}
