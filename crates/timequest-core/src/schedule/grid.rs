//! Day-major slot grid.
//!
//! The grid never decides whether a move is allowed on its own; it answers
//! [`ScheduleGrid::check_run`] and performs unchecked writes that the
//! [`PlacementBoard`](super::PlacementBoard) sequences.

use serde::{Deserialize, Serialize};

use super::Task;
use crate::error::PlacementError;

/// One fixed unit of time in a day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    /// `d{day}-t{index}`
    pub id: String,
    pub day: usize,
    pub index: usize,
    /// Display label, e.g. "3 PM" or "3:30 PM".
    pub time: String,
    #[serde(default)]
    pub task: Option<Task>,
    #[serde(default)]
    pub locked: bool,
}

impl TimeSlot {
    pub fn is_free(&self) -> bool {
        self.task.is_none() && !self.locked
    }

    fn holds(&self, task_id: &str) -> bool {
        self.task.as_ref().is_some_and(|t| t.id == task_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleGrid {
    days: usize,
    slots_per_day: usize,
    slots: Vec<TimeSlot>,
}

impl ScheduleGrid {
    /// Build an empty grid with `days` rows, each labelled by `times`.
    pub fn new<S: AsRef<str>>(days: usize, times: &[S]) -> Self {
        let mut slots = Vec::with_capacity(days * times.len());
        for day in 0..days {
            for (index, time) in times.iter().enumerate() {
                slots.push(TimeSlot {
                    id: format!("d{day}-t{index}"),
                    day,
                    index,
                    time: time.as_ref().to_string(),
                    task: None,
                    locked: false,
                });
            }
        }
        Self {
            days,
            slots_per_day: times.len(),
            slots,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn slots_per_day(&self) -> usize {
        self.slots_per_day
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn slot(&self, day: usize, index: usize) -> Option<&TimeSlot> {
        if day >= self.days || index >= self.slots_per_day {
            return None;
        }
        self.slots.get(day * self.slots_per_day + index)
    }

    /// Resolve a `d{day}-t{index}` identifier.
    pub fn find_slot(&self, id: &str) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn day(&self, day: usize) -> &[TimeSlot] {
        if day >= self.days {
            return &[];
        }
        let start = day * self.slots_per_day;
        &self.slots[start..start + self.slots_per_day]
    }

    /// First slot occupied by `task_id`, as `(day, index)`.
    pub fn position_of(&self, task_id: &str) -> Option<(usize, usize)> {
        self.slots
            .iter()
            .find(|s| s.holds(task_id))
            .map(|s| (s.day, s.index))
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.slots
            .iter()
            .find_map(|s| s.task.as_ref().filter(|t| t.id == task_id))
    }

    pub fn is_locked_task(&self, task_id: &str) -> bool {
        self.slots.iter().any(|s| s.locked && s.holds(task_id))
    }

    /// Number of slots that are neither locked nor assigned.
    pub fn free_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_free()).count()
    }

    /// Each placed task once, in grid order, with the slot where it starts.
    pub fn placed(&self) -> Vec<(&TimeSlot, &Task)> {
        let mut out: Vec<(&TimeSlot, &Task)> = Vec::new();
        for slot in &self.slots {
            if let Some(task) = &slot.task {
                if !out.iter().any(|(_, t)| t.id == task.id) {
                    out.push((slot, task));
                }
            }
        }
        out
    }

    /// Verify that `duration` slots starting at (`day`, `start`) can take
    /// `task_id`. Slots already holding `task_id` count as free so a task
    /// can be nudged over its own footprint.
    pub fn check_run(
        &self,
        task_id: &str,
        day: usize,
        start: usize,
        duration: usize,
    ) -> Result<(), PlacementError> {
        if self.slot(day, start).is_none() {
            return Err(PlacementError::UnknownSlot { day, index: start });
        }
        if duration == 0 || start + duration > self.slots_per_day {
            return Err(PlacementError::Overflow {
                task_id: task_id.to_string(),
                day,
                start,
                duration,
                slots_per_day: self.slots_per_day,
            });
        }
        for slot in self.day(day)[start..start + duration].iter() {
            if slot.locked {
                return Err(PlacementError::Locked {
                    day,
                    index: slot.index,
                });
            }
            if let Some(occupant) = &slot.task {
                if occupant.id != task_id {
                    return Err(PlacementError::Occupied {
                        task_id: task_id.to_string(),
                        day,
                        index: slot.index,
                        occupant: occupant.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Pin a task into the grid as part of the fixed schedule.
    pub fn lock(&mut self, day: usize, start: usize, task: Task) -> Result<(), PlacementError> {
        self.check_run(&task.id, day, start, task.duration)?;
        let base = day * self.slots_per_day + start;
        for slot in &mut self.slots[base..base + task.duration] {
            slot.task = Some(task.clone());
            slot.locked = true;
        }
        Ok(())
    }

    /// Write `task` over its run. Callers must have passed `check_run`.
    pub(super) fn assign(&mut self, day: usize, start: usize, task: &Task) {
        let base = day * self.slots_per_day + start;
        for slot in &mut self.slots[base..base + task.duration] {
            slot.task = Some(task.clone());
        }
    }

    /// Clear every unlocked slot holding `task_id`; returns the task if any
    /// slot held it.
    pub(super) fn clear(&mut self, task_id: &str) -> Option<Task> {
        let mut removed = None;
        for slot in self.slots.iter_mut().filter(|s| !s.locked && s.holds(task_id)) {
            removed = slot.task.take();
        }
        removed
    }
}
