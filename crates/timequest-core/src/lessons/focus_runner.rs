//! Drives a [`FocusQuest`] with three tokio interval tasks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::focus_quest::{ClickOutcome, FocusQuest};

/// A running focus game.
///
/// The clock, spawner and decay tickers stop on their own when the game
/// ends. Dropping the runner aborts any that are still going.
pub struct FocusRunner {
    quest: Arc<Mutex<FocusQuest>>,
    done: Arc<Notify>,
    handles: Vec<JoinHandle<()>>,
}

impl FocusRunner {
    /// Start the tickers. Must be called inside a tokio runtime.
    pub fn start(quest: FocusQuest) -> Self {
        let config = quest.config().clone();
        let quest = Arc::new(Mutex::new(quest));
        let done = Arc::new(Notify::new());
        let started = Instant::now();

        let clock = ticker(&quest, &done, started, config.clock_ms, |q, _| q.tick_clock());
        let spawner = ticker(&quest, &done, started, config.spawn_ms, |q, now| {
            q.spawn(now);
            false
        });
        let decay = ticker(&quest, &done, started, config.decay_ms, |q, now| q.decay(now));

        tracing::debug!(
            clock_ms = config.clock_ms,
            spawn_ms = config.spawn_ms,
            decay_ms = config.decay_ms,
            "focus runner started"
        );
        Self {
            quest,
            done,
            handles: vec![clock, spawner, decay],
        }
    }

    /// Shared handle to the game state.
    pub fn quest(&self) -> Arc<Mutex<FocusQuest>> {
        Arc::clone(&self.quest)
    }

    pub async fn click(&self, key: u64) -> Option<ClickOutcome> {
        let mut quest = self.quest.lock().await;
        let outcome = quest.click(key);
        if quest.is_finished() {
            self.done.notify_one();
        }
        outcome
    }

    /// Wait for the game to end.
    pub async fn finished(&self) {
        if self.quest.lock().await.is_finished() {
            return;
        }
        self.done.notified().await;
    }

    /// Abort every ticker.
    pub fn stop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for FocusRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run `step` every `period_ms` until the quest finishes. `step` gets the
/// milliseconds elapsed since `started` and returns true if it ended the game.
fn ticker<F>(
    quest: &Arc<Mutex<FocusQuest>>,
    done: &Arc<Notify>,
    started: Instant,
    period_ms: u64,
    mut step: F,
) -> JoinHandle<()>
where
    F: FnMut(&mut FocusQuest, u64) -> bool + Send + 'static,
{
    let quest = Arc::clone(quest);
    let done = Arc::clone(done);
    let period = Duration::from_millis(period_ms.max(1));
    tokio::spawn(async move {
        let mut interval = interval_at(started + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let mut q = quest.lock().await;
            if q.is_finished() {
                break;
            }
            let now_ms = started.elapsed().as_millis() as u64;
            if step(&mut q, now_ms) {
                done.notify_one();
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lessons::ItemKind;
    use crate::session::CoinBalance;
    use crate::storage::FocusConfig;

    fn quest(productive_chance: f64) -> FocusQuest {
        let config = FocusConfig {
            productive_chance,
            ..FocusConfig::default()
        };
        FocusQuest::new(config, 20, Some(3))
    }

    #[tokio::test(start_paused = true)]
    async fn clock_ends_the_game_after_its_length() {
        let runner = FocusRunner::start(quest(1.0));
        let begin = Instant::now();
        runner.finished().await;
        assert!(begin.elapsed() >= Duration::from_secs(35));

        let state = runner.quest();
        let q = state.lock().await;
        assert!(q.is_finished());
        assert_eq!(q.time_left(), 0);
        assert_eq!(q.focus(), 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn clicks_reach_the_shared_quest() {
        let runner = FocusRunner::start(quest(1.0));
        tokio::time::sleep(Duration::from_millis(1600)).await;

        let key = {
            let state = runner.quest();
            let q = state.lock().await;
            assert_eq!(q.items().len(), 1);
            assert_eq!(q.items()[0].kind, ItemKind::Productive);
            q.items()[0].key
        };
        let outcome = runner.click(key).await.unwrap();
        assert_eq!(outcome.score, 10);
        assert!(runner.click(key).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn distractions_drain_focus_to_zero() {
        let runner = FocusRunner::start(quest(0.0));
        runner.finished().await;

        let state = runner.quest();
        let mut q = state.lock().await;
        assert_eq!(q.focus(), 0.0);
        assert!(q.time_left() > 0);
        let mut coins = CoinBalance::new();
        assert_eq!(crate::events::Event::coins_in(&q.settle(&mut coins)), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_aborts_tickers() {
        let mut runner = FocusRunner::start(quest(0.45));
        runner.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;
        let state = runner.quest();
        let q = state.lock().await;
        assert_eq!(q.time_left(), 35);
        assert!(q.items().is_empty());
    }
}
