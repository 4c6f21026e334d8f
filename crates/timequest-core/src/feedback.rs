//! Rule-based review of a finished schedule.
//!
//! These heuristics run offline and never fail; the weekly planner can also
//! ask the external analyzer for a second opinion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schedule::{ScheduleGrid, Task, TaskCategory};

pub const WORK_THEN_PLAY: &str = "You worked then played—great job!";
pub const PLAY_BEFORE_WORK: &str = "Try scheduling chores before fun next time.";
pub const SPREAD_OUT: &str =
    "Great plan! Spreading your work out before each deadline is a smart move.";

/// Pass/fail verdict with the line shown to the student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub passed: bool,
    pub message: String,
}

/// Verdict in the shape the schedule analyzer returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAnalysis {
    pub is_good: bool,
    pub feedback: String,
}

/// Passes when no student-placed fun task comes before school or chore work.
/// Fixed (locked) blocks are ignored.
pub fn work_before_fun(grid: &ScheduleGrid) -> Review {
    let order: Vec<TaskCategory> = grid
        .placed()
        .into_iter()
        .filter(|(slot, _)| !slot.locked)
        .map(|(_, task)| task.category)
        .collect();

    let first_fun = order.iter().position(|c| *c == TaskCategory::Fun);
    let last_work = order.iter().rposition(TaskCategory::is_work);
    let passed = match (first_fun, last_work) {
        (Some(fun), Some(work)) => fun > work,
        _ => true,
    };

    Review {
        passed,
        message: if passed { WORK_THEN_PLAY } else { PLAY_BEFORE_WORK }.to_string(),
    }
}

/// Check every placed task against its deadline.
///
/// A task placed after its due day fails the plan. A plan where every
/// session of some multi-session assignment lands on the due day itself
/// passes with a nudge to start earlier.
pub fn deadline_review(grid: &ScheduleGrid, day_names: &[&str]) -> ScheduleAnalysis {
    let placed = grid.placed();
    let day_name = |day: usize| day_names.get(day).copied().unwrap_or("that day");

    if let Some((slot, task)) = placed
        .iter()
        .find(|(slot, task)| task.deadline.is_some_and(|d| slot.day > d))
    {
        let due = task.deadline.map(day_name).unwrap_or("its deadline");
        tracing::debug!(task = %task.id, day = slot.day, "task scheduled after deadline");
        return ScheduleAnalysis {
            is_good: false,
            feedback: format!(
                "Uh oh! {} is scheduled on {} but it's due {}. Move it earlier so you finish on time.",
                task.text,
                day_name(slot.day),
                due
            ),
        };
    }

    let mut groups: BTreeMap<(&str, usize), Vec<usize>> = BTreeMap::new();
    for (slot, task) in &placed {
        if let Some(deadline) = task.deadline {
            groups
                .entry((task.text.as_str(), deadline))
                .or_default()
                .push(slot.day);
        }
    }
    let crammed = groups
        .iter()
        .find(|((_, deadline), days)| days.len() > 1 && days.iter().all(|d| d == deadline));
    if let Some(((text, deadline), _)) = crammed {
        return ScheduleAnalysis {
            is_good: true,
            feedback: format!(
                "Your plan looks good! To make it even better, try starting {} a little earlier instead of doing it all on {}.",
                text,
                day_name(*deadline)
            ),
        };
    }

    ScheduleAnalysis {
        is_good: true,
        feedback: SPREAD_OUT.to_string(),
    }
}

/// Tasks whose placement ends after their due day.
pub fn late_tasks<'a>(grid: &'a ScheduleGrid) -> Vec<&'a Task> {
    grid.placed()
        .into_iter()
        .filter(|(slot, task)| task.deadline.is_some_and(|d| slot.day > d))
        .map(|(_, task)| task)
        .collect()
}
