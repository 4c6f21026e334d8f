//! Session snapshot kept between CLI invocations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use timequest_core::lessons::{Delegation, Prioritization, SmartGoals, TimeBlocking, WeeklySchedule};
use timequest_core::storage::RewardsConfig;
use timequest_core::{Config, Database, Session};

const SESSION_KEY: &str = "session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliState {
    pub session: Session,
    /// Date whose time-blocking board is loaded.
    pub blocking_date: NaiveDate,
    pub blocking: TimeBlocking,
    pub weekly: WeeklySchedule,
    pub priority: Prioritization,
    pub delegation: Delegation,
    pub goals: SmartGoals,
}

impl CliState {
    pub fn new(rewards: &RewardsConfig, today: NaiveDate) -> Self {
        Self {
            session: Session::new(today),
            blocking_date: today,
            blocking: TimeBlocking::new(rewards.time_blocking, rewards.custom_task),
            weekly: WeeklySchedule::new(rewards.weekly_schedule),
            priority: Prioritization::new(rewards.prioritization),
            delegation: Delegation::new(rewards.delegation),
            goals: SmartGoals::new(rewards.smart_goals),
        }
    }

    /// The saved session, or a fresh one on first run.
    pub fn load(db: &Database, config: &Config, today: NaiveDate) -> Result<Self, Box<dyn std::error::Error>> {
        match db.get_json::<CliState>(SESSION_KEY)? {
            Some(state) => Ok(state),
            None => {
                tracing::debug!("starting a new session");
                Ok(Self::new(&config.rewards, today))
            }
        }
    }

    pub fn save(&self, db: &Database) -> Result<(), Box<dyn std::error::Error>> {
        db.set_json(SESSION_KEY, self)?;
        Ok(())
    }

    pub fn clear(db: &Database) -> Result<bool, Box<dyn std::error::Error>> {
        Ok(db.kv_delete(SESSION_KEY)?)
    }
}

/// Open the store, load config and session, run `f`, then save the session.
pub fn with_state<T>(
    f: impl FnOnce(&mut CliState, &Database, &Config) -> Result<T, Box<dyn std::error::Error>>,
) -> Result<T, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let mut state = CliState::load(&db, &config, super::today())?;
    let out = f(&mut state, &db, &config)?;
    state.save(&db)?;
    Ok(out)
}
