//! Drag-into-the-right-box board shared by prioritization and delegation.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::PlacementError;

/// A card with exactly one right bin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortTask<B> {
    pub id: String,
    pub text: String,
    pub answer: B,
    /// Shown when the card lands in the right bin.
    #[serde(default)]
    pub praise: Option<String>,
}

impl<B> SortTask<B> {
    pub fn new(id: &str, text: &str, answer: B) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            answer,
            praise: None,
        }
    }

    pub fn with_praise(mut self, praise: &str) -> Self {
        self.praise = Some(praise.to_string());
        self
    }
}

/// Result of checking one card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verdict {
    pub task_id: String,
    pub correct: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(bound(
    serialize = "B: Serialize + Ord",
    deserialize = "B: DeserializeOwned + Ord"
))]
pub struct SortingBoard<B> {
    pool: Vec<SortTask<B>>,
    bins: BTreeMap<B, Vec<SortTask<B>>>,
    total: usize,
    submitted: bool,
}

impl<B: Copy + Ord> SortingBoard<B> {
    pub fn new(tasks: Vec<SortTask<B>>) -> Self {
        Self {
            total: tasks.len(),
            pool: tasks,
            bins: BTreeMap::new(),
            submitted: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn pool(&self) -> &[SortTask<B>] {
        &self.pool
    }

    pub fn bin(&self, bin: B) -> &[SortTask<B>] {
        self.bins.get(&bin).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn all_placed(&self) -> bool {
        self.pool.is_empty() && self.bins.values().map(Vec::len).sum::<usize>() == self.total
    }

    /// Which bin currently holds `task_id`, if any.
    pub fn bin_of(&self, task_id: &str) -> Option<B> {
        self.bins
            .iter()
            .find(|(_, tasks)| tasks.iter().any(|t| t.id == task_id))
            .map(|(bin, _)| *bin)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Move a card into `to`, or back to the pool when `to` is `None`.
    /// Cards land at the end of their destination.
    pub fn move_to(&mut self, task_id: &str, to: Option<B>) -> Result<(), PlacementError> {
        if self.submitted {
            return Err(PlacementError::Submitted);
        }
        let task = self
            .take(task_id)
            .ok_or_else(|| PlacementError::UnknownTask(task_id.to_string()))?;
        match to {
            Some(bin) => self.bins.entry(bin).or_default().push(task),
            None => self.pool.push(task),
        }
        Ok(())
    }

    /// Send every card in `bin` back to the pool.
    pub fn empty_bin(&mut self, bin: B) -> usize {
        let tasks = self.bins.remove(&bin).unwrap_or_default();
        let n = tasks.len();
        self.pool.extend(tasks);
        n
    }

    /// Grade every placed card, bin by bin, and lock the board.
    pub fn grade(&mut self, miss: Option<&str>) -> Vec<Verdict> {
        self.submitted = true;
        self.bins
            .iter()
            .flat_map(|(bin, tasks)| {
                tasks.iter().map(move |t| {
                    let correct = t.answer == *bin;
                    Verdict {
                        task_id: t.id.clone(),
                        correct,
                        message: if correct {
                            t.praise.clone()
                        } else {
                            miss.map(str::to_string)
                        },
                    }
                })
            })
            .collect()
    }

    fn take(&mut self, task_id: &str) -> Option<SortTask<B>> {
        if let Some(pos) = self.pool.iter().position(|t| t.id == task_id) {
            return Some(self.pool.remove(pos));
        }
        for tasks in self.bins.values_mut() {
            if let Some(pos) = tasks.iter().position(|t| t.id == task_id) {
                return Some(tasks.remove(pos));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
    enum Bin {
        Left,
        Right,
    }

    fn board() -> SortingBoard<Bin> {
        SortingBoard::new(vec![
            SortTask::new("a", "Apple", Bin::Left).with_praise("Yum"),
            SortTask::new("b", "Bat", Bin::Right),
        ])
    }

    #[test]
    fn moves_between_pool_and_bins() {
        let mut b = board();
        b.move_to("a", Some(Bin::Right)).unwrap();
        b.move_to("a", Some(Bin::Left)).unwrap();
        assert_eq!(b.bin_of("a"), Some(Bin::Left));
        assert!(b.bin(Bin::Right).is_empty());
        b.move_to("a", None).unwrap();
        assert_eq!(b.pool().len(), 2);
        assert!(b.move_to("zzz", None).is_err());
    }

    #[test]
    fn grade_locks_the_board() {
        let mut b = board();
        b.move_to("a", Some(Bin::Left)).unwrap();
        b.move_to("b", Some(Bin::Left)).unwrap();
        assert!(b.all_placed());

        let verdicts = b.grade(Some("Nope"));
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0].message.as_deref(), Some("Yum"));
        assert!(!verdicts[1].correct);
        assert_eq!(verdicts[1].message.as_deref(), Some("Nope"));
        assert_eq!(b.move_to("a", None), Err(PlacementError::Submitted));
    }

    #[test]
    fn empty_bin_returns_cards() {
        let mut b = board();
        b.move_to("a", Some(Bin::Left)).unwrap();
        assert_eq!(b.empty_bin(Bin::Left), 1);
        assert!(!b.all_placed());
    }

    #[test]
    fn board_roundtrips_through_json() {
        let mut b = board();
        b.move_to("b", Some(Bin::Right)).unwrap();
        let json = serde_json::to_string(&b).unwrap();
        let back: SortingBoard<Bin> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }
}
