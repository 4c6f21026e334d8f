//! Defeating distractions: a timed game of catching helpful thoughts.
//!
//! [`FocusQuest`] is driven by three clocks that the caller owns: a one
//! second countdown ([`FocusQuest::tick_clock`]), a spawner
//! ([`FocusQuest::spawn`]) and a focus decay tick ([`FocusQuest::decay`]).
//! Timestamps are milliseconds since the game started. See
//! [`FocusRunner`](super::FocusRunner) for the tokio-driven version.

use chrono::Utc;
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use super::LessonId;
use crate::events::Event;
use crate::session::{CoinBalance, RewardLatch};
use crate::storage::FocusConfig;

/// A homework task plus the thoughts that help or hurt it.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Scenario {
    pub task: &'static str,
    pub distractions: [&'static str; 5],
    pub productive: [&'static str; 5],
}

pub static SCENARIOS: [Scenario; 3] = [
    Scenario {
        task: "Write a book report on 'Charlotte's Web'.",
        distractions: [
            "Check if my favorite show is on.",
            "I should go get a snack.",
            "I wonder what new videos are online.",
            "Let's see what my friends are texting about.",
            "Maybe I'll just read one more chapter for fun instead.",
        ],
        productive: [
            "What's the main theme of the book?",
            "I should jot down the main characters.",
            "Let's make an outline first.",
            "What's a good opening sentence?",
            "I'll re-read the part about the fair.",
        ],
    },
    Scenario {
        task: "Study for a science test on the solar system.",
        distractions: [
            "Is it time to play video games yet?",
            "I'm getting a little sleepy.",
            "I'll just look at pictures of cats for a minute.",
            "I should practice my drawing.",
            "Let me check the weather for tomorrow.",
        ],
        productive: [
            "How many planets are there again?",
            "I'll make flashcards for each planet.",
            "What's a fun fact about Mars?",
            "Let me draw a diagram of the solar system.",
            "I'll review my notes from class.",
        ],
    },
    Scenario {
        task: "Clean my room before my friend comes over.",
        distractions: [
            "I'll just lie down for five minutes.",
            "This old toy is cool, I should play with it.",
            "Let me try on all my clothes.",
            "I should see what's in the fridge.",
            "I'll listen to one more song first.",
        ],
        productive: [
            "I should start with the big stuff, like my bed.",
            "I'll make a pile for toys and a pile for clothes.",
            "Where does this book belong?",
            "Let me put all the trash in a bag.",
            "I can listen to music while I work!",
        ],
    },
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Distraction,
    Productive,
}

/// A thought floating on screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FocusItem {
    pub key: u64,
    pub kind: ItemKind,
    pub text: String,
    /// Percent of the play area, 10..85.
    pub x: f64,
    pub y: f64,
    pub spawned_ms: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestState {
    Playing,
    Finished,
}

/// What a click did.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClickOutcome {
    pub kind: ItemKind,
    pub text: String,
    pub score: u32,
    pub focus: f64,
}

#[derive(Debug, Clone)]
pub struct FocusQuest {
    config: FocusConfig,
    rng: Mcg128Xsl64,
    scenario_index: usize,
    distractions: Vec<&'static str>,
    productive: Vec<&'static str>,
    items: Vec<FocusItem>,
    next_key: u64,
    score: u32,
    focus: f64,
    time_left: u32,
    misclicks: Vec<String>,
    state: QuestState,
    latch: RewardLatch,
    reward: u32,
}

impl FocusQuest {
    /// A new game on a random scenario. Pass a seed for a repeatable game.
    pub fn new(config: FocusConfig, reward: u32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        let mut quest = Self {
            focus: config.initial_focus,
            time_left: config.game_secs,
            config,
            rng,
            scenario_index: 0,
            distractions: Vec::new(),
            productive: Vec::new(),
            items: Vec::new(),
            next_key: 0,
            score: 0,
            misclicks: Vec::new(),
            state: QuestState::Playing,
            latch: RewardLatch::default(),
            reward,
        };
        quest.setup();
        quest
    }

    fn setup(&mut self) {
        self.scenario_index = self.rng.gen_range(0..SCENARIOS.len());
        self.distractions.clear();
        self.productive.clear();
        tracing::debug!(scenario = self.scenario_index, "focus quest set up");
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    pub fn scenario(&self) -> &'static Scenario {
        &SCENARIOS[self.scenario_index % SCENARIOS.len()]
    }

    pub fn state(&self) -> QuestState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == QuestState::Finished
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn focus(&self) -> f64 {
        self.focus
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn items(&self) -> &[FocusItem] {
        &self.items
    }

    /// Distractions the player clicked, in order.
    pub fn misclicks(&self) -> &[String] {
        &self.misclicks
    }

    pub fn passed(&self) -> bool {
        self.score >= self.config.pass_score
    }

    pub fn final_message(&self) -> &'static str {
        if self.score >= 150 {
            "Amazing focus! You're a true Focus Champion!"
        } else if self.score >= 70 {
            "Great job! You focused on the helpful thoughts."
        } else {
            "Good try! Keep practicing and you'll become a focus master."
        }
    }

    // ── Clocks ───────────────────────────────────────────────────────

    /// One second passes. Returns true if this tick ended the game.
    pub fn tick_clock(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        if self.time_left <= 1 {
            self.time_left = 0;
            self.finish("time");
            return true;
        }
        self.time_left -= 1;
        false
    }

    /// Put a new thought on screen. Each deck is reshuffled once it runs out.
    pub fn spawn(&mut self, now_ms: u64) -> Option<FocusItem> {
        if self.is_finished() {
            return None;
        }
        let scenario = self.scenario();
        if self.distractions.is_empty() {
            self.distractions = scenario.distractions.to_vec();
            self.distractions.shuffle(&mut self.rng);
        }
        if self.productive.is_empty() {
            self.productive = scenario.productive.to_vec();
            self.productive.shuffle(&mut self.rng);
        }

        let (kind, text) = if self.rng.gen::<f64>() < self.config.productive_chance {
            (ItemKind::Productive, self.productive.pop())
        } else {
            (ItemKind::Distraction, self.distractions.pop())
        };
        let item = FocusItem {
            key: self.next_key,
            kind,
            text: text?.to_string(),
            x: self.rng.gen::<f64>() * 75.0 + 10.0,
            y: self.rng.gen::<f64>() * 75.0 + 10.0,
            spawned_ms: now_ms,
        };
        self.next_key += 1;
        self.items.push(item.clone());
        Some(item)
    }

    /// Expire old thoughts and drain focus for every distraction that has
    /// been on screen past the grace period. Returns true if this tick ended
    /// the game.
    pub fn decay(&mut self, now_ms: u64) -> bool {
        if self.is_finished() {
            return false;
        }
        let lifespan = self.config.lifespan_ms;
        self.items
            .retain(|i| now_ms.saturating_sub(i.spawned_ms) < lifespan);
        let aged = self
            .items
            .iter()
            .filter(|i| {
                i.kind == ItemKind::Distraction
                    && now_ms.saturating_sub(i.spawned_ms) > self.config.grace_ms
            })
            .count();
        self.focus = (self.focus - aged as f64 * self.config.drain_per_tick()).max(0.0);
        if self.focus <= 0.0 {
            self.finish("focus");
            return true;
        }
        false
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Click a thought. It leaves the screen at once, so a second click on
    /// the same key does nothing.
    pub fn click(&mut self, key: u64) -> Option<ClickOutcome> {
        if self.is_finished() {
            return None;
        }
        let pos = self.items.iter().position(|i| i.key == key)?;
        let item = self.items.remove(pos);
        match item.kind {
            ItemKind::Productive => {
                self.score += 10;
                self.focus = (self.focus + 5.0).min(self.config.initial_focus);
            }
            ItemKind::Distraction => {
                self.score = self.score.saturating_sub(5);
                self.focus = (self.focus - 10.0).max(0.0);
                self.misclicks.push(item.text.clone());
            }
        }
        tracing::trace!(key, kind = ?item.kind, score = self.score, focus = self.focus, "thought clicked");
        if self.focus <= 0.0 {
            self.finish("focus");
        }
        Some(ClickOutcome {
            kind: item.kind,
            text: item.text,
            score: self.score,
            focus: self.focus,
        })
    }

    fn finish(&mut self, reason: &str) {
        self.state = QuestState::Finished;
        tracing::debug!(reason, score = self.score, "focus quest finished");
    }

    /// Report a finished game and pay the bonus once if the score is high
    /// enough. Does nothing while the game is running.
    pub fn settle(&mut self, coins: &mut CoinBalance) -> Vec<Event> {
        if !self.is_finished() {
            return Vec::new();
        }
        let passed = self.passed();
        let mut events = vec![Event::LessonFinished {
            lesson: LessonId::FocusQuest,
            passed,
            message: self.final_message().to_string(),
            at: Utc::now(),
        }];
        if passed {
            events.extend(self.latch.claim(LessonId::FocusQuest, self.reward, coins));
        }
        events
    }

    /// Fresh game on a new random scenario.
    pub fn play_again(&mut self) -> Vec<Event> {
        self.items.clear();
        self.score = 0;
        self.focus = self.config.initial_focus;
        self.time_left = self.config.game_secs;
        self.misclicks.clear();
        self.state = QuestState::Playing;
        self.latch.reset();
        self.setup();
        vec![Event::RoundStarted {
            lesson: LessonId::FocusQuest,
            set_index: self.scenario_index,
            at: Utc::now(),
        }]
    }
}
