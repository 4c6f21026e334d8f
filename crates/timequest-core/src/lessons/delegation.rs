//! The art of delegation: hand each Family Fun Night job to the right person.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::sorting::{SortTask, SortingBoard, Verdict};
use super::{next_set, LessonId};
use crate::error::{PlacementError, Result, ValidationError};
use crate::events::Event;
use crate::session::{CoinBalance, RewardLatch};

pub const DELEGATION_MISS: &str = "Hmm, maybe someone else is better for this?";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Helper {
    You,
    Mom,
    Dad,
    Sister,
    Brother,
}

impl Helper {
    pub const ALL: [Helper; 5] = [Helper::You, Helper::Mom, Helper::Dad, Helper::Sister, Helper::Brother];

    /// Siblings only join once the student adds them.
    pub fn is_sibling(&self) -> bool {
        matches!(self, Helper::Sister | Helper::Brother)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Helper::You => "You",
            Helper::Mom => "Mom",
            Helper::Dad => "Dad",
            Helper::Sister => "Big Sister",
            Helper::Brother => "Big Brother",
        }
    }

    pub fn skills(&self) -> &'static str {
        match self {
            Helper::You => "Your tasks to own!",
            Helper::Mom => "Good at organizing & shopping",
            Helper::Dad => "Good at fixing things & building",
            Helper::Sister => "Good at research & being creative",
            Helper::Brother => "Good at helping & organizing",
        }
    }
}

impl fmt::Display for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Helper::You => "you",
            Helper::Mom => "mom",
            Helper::Dad => "dad",
            Helper::Sister => "sister",
            Helper::Brother => "brother",
        };
        f.write_str(s)
    }
}

impl FromStr for Helper {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Helper::ALL
            .into_iter()
            .find(|h| h.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown helper '{s}' (expected you, mom, dad, sister or brother)"))
    }
}

const SETS: [&[(&str, &str, Helper, &str)]; 1] = [&[
    (
        "task-1",
        "Bake a cake for the party",
        Helper::Mom,
        "Mom is great at following recipes! Good choice.",
    ),
    (
        "task-2",
        "Fix the broken game controller",
        Helper::Dad,
        "Dad is great at fixing things. He's the perfect person for this!",
    ),
    (
        "task-3",
        "Research fun party game ideas",
        Helper::Sister,
        "Your sister is super creative and great at finding fun ideas online!",
    ),
    (
        "task-4",
        "Finish my math homework",
        Helper::You,
        "This is your homework, so it's your responsibility to finish it.",
    ),
    (
        "task-5",
        "Clean my room before guests arrive",
        Helper::You,
        "Keeping your own space tidy is a great way to help out.",
    ),
    (
        "task-6",
        "Solve a tricky science question",
        Helper::Dad,
        "It's wise to ask for help when you're stuck. Dad can help you.",
    ),
]];

fn load_set(index: usize) -> SortingBoard<Helper> {
    let tasks = SETS[index % SETS.len()]
        .iter()
        .map(|(id, text, helper, praise)| SortTask::new(id, text, *helper).with_praise(praise))
        .collect();
    SortingBoard::new(tasks)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Delegation {
    set_index: usize,
    siblings: Vec<Helper>,
    board: SortingBoard<Helper>,
    verdicts: Vec<Verdict>,
    latch: RewardLatch,
    reward: u32,
}

impl Delegation {
    pub fn new(reward: u32) -> Self {
        Self {
            set_index: 0,
            siblings: Vec::new(),
            board: load_set(0),
            verdicts: Vec::new(),
            latch: RewardLatch::default(),
            reward,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// You, Mom and Dad, then any added siblings in the order added.
    pub fn helpers(&self) -> Vec<Helper> {
        let mut out = vec![Helper::You, Helper::Mom, Helper::Dad];
        out.extend(self.siblings.iter().copied());
        out
    }

    pub fn board(&self) -> &SortingBoard<Helper> {
        &self.board
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn is_all_correct(&self) -> bool {
        self.board.is_submitted() && self.board.all_placed() && self.verdicts.iter().all(|v| v.correct)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Add a sibling as a helper. Adding one twice is a no-op.
    pub fn add_sibling(&mut self, sibling: Helper) -> Result<()> {
        if !sibling.is_sibling() {
            return Err(ValidationError::InvalidValue {
                field: "sibling".into(),
                message: format!("{} is always available", sibling.name()),
            }
            .into());
        }
        if !self.siblings.contains(&sibling) {
            self.siblings.push(sibling);
        }
        Ok(())
    }

    /// Remove a sibling; anything handed to them goes back to the task list.
    pub fn remove_sibling(&mut self, sibling: Helper) -> Result<usize> {
        if self.board.is_submitted() {
            return Err(PlacementError::Submitted.into());
        }
        self.siblings.retain(|s| *s != sibling);
        Ok(self.board.empty_bin(sibling))
    }

    /// Hand a task to `to`, or take it back with `None`.
    pub fn assign(&mut self, task_id: &str, to: Option<Helper>) -> Result<Vec<Event>> {
        if let Some(helper) = to {
            if helper.is_sibling() && !self.siblings.contains(&helper) {
                return Err(ValidationError::DelegateUnavailable(helper.name().to_string()).into());
            }
        }
        self.board.move_to(task_id, to)?;
        let at = Utc::now();
        let lesson = LessonId::Delegation;
        Ok(vec![match to {
            Some(helper) => Event::TaskSorted {
                lesson,
                task_id: task_id.to_string(),
                bin: helper.to_string(),
                at,
            },
            None => Event::TaskUnplaced {
                lesson,
                task_id: task_id.to_string(),
                at,
            },
        }])
    }

    /// Per-task feedback. Pays once when every task is handed out and every
    /// choice is right.
    pub fn check(&mut self, coins: &mut CoinBalance) -> Result<Vec<Event>> {
        if self.board.is_submitted() {
            return Err(PlacementError::Submitted.into());
        }
        self.verdicts = self.board.grade(Some(DELEGATION_MISS));
        let passed = self.board.all_placed() && self.verdicts.iter().all(|v| v.correct);
        tracing::debug!(passed, graded = self.verdicts.len(), "delegation checked");

        let message = if passed {
            format!("Great delegating! You earned +{} Coins!", self.reward)
        } else {
            "Some jobs could go to someone else. Try again!".to_string()
        };
        let mut events = vec![Event::LessonFinished {
            lesson: LessonId::Delegation,
            passed,
            message,
            at: Utc::now(),
        }];
        if passed {
            events.extend(self.latch.claim(LessonId::Delegation, self.reward, coins));
        }
        Ok(events)
    }

    /// Start again with the next task set. Added siblings stay.
    pub fn next_round(&mut self) -> Vec<Event> {
        self.set_index = next_set(self.set_index, SETS.len());
        self.board = load_set(self.set_index);
        self.verdicts.clear();
        self.latch.reset();
        vec![Event::RoundStarted {
            lesson: LessonId::Delegation,
            set_index: self.set_index,
            at: Utc::now(),
        }]
    }
}
