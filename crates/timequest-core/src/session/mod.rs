//! Per-session application state.
//!
//! A [`Session`] owns the coin balance, the calendar and the to-do lists.
//! Lessons borrow the pieces they need by reference; nothing here is global.

mod calendar;
mod coins;
mod todos;

pub use calendar::{parse_time, weekday_name, CalendarEvent, Deadline, EventBook};
pub use coins::{CoinBalance, RewardLatch};
pub use todos::{TodoBoard, TodoItem, TodoList};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub started_at: DateTime<Utc>,
    pub coins: CoinBalance,
    pub calendar: EventBook,
    pub todos: TodoBoard,
}

impl Session {
    /// Fresh session with sample calendar events around `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            started_at: Utc::now(),
            coins: CoinBalance::new(),
            calendar: EventBook::seeded(today),
            todos: TodoBoard::default(),
        }
    }

    /// Dashboard view: the next three things due.
    pub fn upcoming_deadlines(&self, today: NaiveDate) -> Vec<Deadline> {
        self.calendar.upcoming_deadlines(today, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_broke_with_samples() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let session = Session::new(today);
        assert_eq!(session.coins.coins(), 0);
        assert_eq!(session.upcoming_deadlines(today).len(), 3);
        assert_eq!(session.todos.lists().len(), 3);
    }

    #[test]
    fn session_roundtrips_through_json() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut session = Session::new(today);
        session.coins.add(35);
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
