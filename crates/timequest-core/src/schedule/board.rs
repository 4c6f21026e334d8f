//! Placement board: the unscheduled pool plus the grid.
//!
//! Every move is validated against a view of the grid in which the moving
//! task's own footprint is free, and nothing is written unless the whole run
//! passes. A rejected drop leaves both the pool and the grid untouched.

use serde::{Deserialize, Serialize};

use super::{ScheduleGrid, Task};
use crate::error::PlacementError;

/// Where a task ended up after a successful drop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub task_id: String,
    pub day: usize,
    pub start: usize,
    pub duration: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacementBoard {
    pool: Vec<Task>,
    grid: ScheduleGrid,
}

impl PlacementBoard {
    pub fn new(pool: Vec<Task>, grid: ScheduleGrid) -> Self {
        Self { pool, grid }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn pool(&self) -> &[Task] {
        &self.pool
    }

    pub fn grid(&self) -> &ScheduleGrid {
        &self.grid
    }

    /// True once every pool task has a slot.
    pub fn is_pool_empty(&self) -> bool {
        self.pool.is_empty()
    }

    fn find(&self, task_id: &str) -> Option<&Task> {
        self.pool
            .iter()
            .find(|t| t.id == task_id)
            .or_else(|| self.grid.task(task_id))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Add a new task to the end of the pool.
    pub fn push(&mut self, task: Task) {
        self.pool.push(task);
    }

    /// Drop `task_id` (from the pool or from elsewhere on the grid) so that
    /// it starts at (`day`, `start`).
    pub fn drop_on_slot(
        &mut self,
        task_id: &str,
        day: usize,
        start: usize,
    ) -> Result<Placement, PlacementError> {
        if self.grid.is_locked_task(task_id) {
            return Err(PlacementError::FixedTask(task_id.to_string()));
        }
        let task = self
            .find(task_id)
            .cloned()
            .ok_or_else(|| PlacementError::UnknownTask(task_id.to_string()))?;

        if let Err(err) = self.grid.check_run(&task.id, day, start, task.duration) {
            tracing::debug!(task = %task.id, day, start, %err, "placement rejected");
            return Err(err);
        }

        self.pool.retain(|t| t.id != task.id);
        self.grid.clear(&task.id);
        self.grid.assign(day, start, &task);
        tracing::debug!(task = %task.id, day, start, duration = task.duration, "task placed");

        Ok(Placement {
            task_id: task.id,
            day,
            start,
            duration: task.duration,
        })
    }

    /// Drop a task by target slot id (`d{day}-t{index}`).
    pub fn drop_on_slot_id(&mut self, task_id: &str, slot_id: &str) -> Result<Placement, PlacementError> {
        let (day, index) = self
            .grid
            .find_slot(slot_id)
            .map(|s| (s.day, s.index))
            .ok_or_else(|| PlacementError::UnknownSlotId(slot_id.to_string()))?;
        self.drop_on_slot(task_id, day, index)
    }

    /// Move a task from the grid back to the pool. A task already in the
    /// pool stays where it is.
    pub fn return_to_pool(&mut self, task_id: &str) -> Result<(), PlacementError> {
        if self.grid.is_locked_task(task_id) {
            return Err(PlacementError::FixedTask(task_id.to_string()));
        }
        if self.pool.iter().any(|t| t.id == task_id) {
            return Ok(());
        }
        let task = self
            .grid
            .clear(task_id)
            .ok_or_else(|| PlacementError::UnknownTask(task_id.to_string()))?;
        tracing::debug!(task = %task.id, "task returned to pool");
        self.pool.push(task);
        Ok(())
    }
}
