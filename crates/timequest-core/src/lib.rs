//! # TimeQuest Core Library
//!
//! This library provides the core logic for TimeQuest, a set of interactive
//! time-management lessons for young students. Everything is available
//! through the `timequest` CLI, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Schedule**: a slot grid and placement board that accept or reject task
//!   drops atomically
//! - **Lessons**: self-contained state machines that pay coins into the
//!   session when completed
//! - **Feedback**: offline heuristics for judging a finished schedule
//! - **AI**: prompt flows over a pluggable [`PlannerModel`]
//! - **Storage**: SQLite key-value store and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`PlacementBoard`]: pool of unplaced tasks plus the grid
//! - [`Session`]: coin balance, calendar and to-do lists
//! - [`Database`]: per-date lesson state and the CLI session snapshot
//! - [`Config`]: rewards, focus game tuning and AI endpoint settings

pub mod ai;
pub mod error;
pub mod events;
pub mod feedback;
pub mod lessons;
pub mod pricing;
pub mod schedule;
pub mod session;
pub mod storage;

pub use ai::{HttpPlanner, PlannerModel, PromptRequest};
pub use error::{AiError, ConfigError, CoreError, PlacementError, StoreError, ValidationError};
pub use events::Event;
pub use feedback::{Review, ScheduleAnalysis};
pub use lessons::{LessonId, CATALOG};
pub use pricing::{Plan, PlanTier, PLANS};
pub use schedule::{Placement, PlacementBoard, ScheduleGrid, Task, TaskCategory, TimeSlot};
pub use session::{CalendarEvent, CoinBalance, Session};
pub use storage::{Config, Database};
