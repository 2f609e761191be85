//! Cooldown and rate-cap gate in front of the notifier.
//!
//! Per (action, app) key the gate is either `Cool` or `Shown(at)`; a key
//! returns to `Cool` once its cooldown has elapsed. On top of that a global
//! rolling window caps how many tips may appear in a burst. Time comes from
//! the injected [`Clock`], never from the events themselves.

mod config;

pub use config::DebounceConfig;

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde::Serialize;

use crate::classifier::ActionLabel;
use crate::clock::Clock;
use crate::input::normalize_app_key;
use crate::resolver::ResolvedTip;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationKey {
    pub action: ActionLabel,
    /// Normalised app key, so `EXCEL.EXE` and `Excel` share a cooldown.
    pub app_context: String,
}

impl NotificationKey {
    pub fn new(action: ActionLabel, app_context: &str) -> Self {
        Self {
            action,
            app_context: normalize_app_key(app_context),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub action_label: ActionLabel,
    pub app_context: String,
    pub shown_at_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Show,
    SuppressedCooldown { remaining_ms: u64 },
    SuppressedRateLimit,
}

impl Decision {
    pub fn is_show(&self) -> bool {
        matches!(self, Decision::Show)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Show => "shown",
            Decision::SuppressedCooldown { .. } => "suppressed_cooldown",
            Decision::SuppressedRateLimit => "suppressed_rate_limit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Cool,
    Shown { at_ms: u64 },
}

pub struct Debouncer {
    config: DebounceConfig,
    clock: Arc<dyn Clock>,
    records: HashMap<NotificationKey, NotificationRecord>,
    recent_shows: VecDeque<u64>,
}

impl Debouncer {
    pub fn new(config: DebounceConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            records: HashMap::new(),
            recent_shows: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// Decides for `tip` and records a show. Time is the clock's reading, or
    /// the tip's own detection time when that is later (replayed input runs
    /// ahead of the clock).
    pub fn decide(&mut self, tip: &ResolvedTip) -> Decision {
        let now = self.decision_time(tip);
        self.decide_at(tip.action, &tip.app_context, now)
    }

    pub fn decision_time(&self, tip: &ResolvedTip) -> u64 {
        self.clock.now_ms().max(tip.detected_at_ms)
    }

    pub fn decide_at(&mut self, action: ActionLabel, app_context: &str, now_ms: u64) -> Decision {
        self.prune(now_ms);

        let key = NotificationKey::new(action, app_context);
        if let Some(record) = self.records.get(&key) {
            let elapsed = now_ms.saturating_sub(record.shown_at_ms);
            return Decision::SuppressedCooldown {
                remaining_ms: self.config.cooldown_ms().saturating_sub(elapsed),
            };
        }

        let cap = self.config.rate_limit_max as usize;
        if cap > 0 && self.recent_shows.len() >= cap {
            return Decision::SuppressedRateLimit;
        }

        self.recent_shows.push_back(now_ms);
        self.records.insert(
            key.clone(),
            NotificationRecord {
                action_label: action,
                app_context: key.app_context,
                shown_at_ms: now_ms,
            },
        );
        Decision::Show
    }

    pub fn state(&self, key: &NotificationKey, now_ms: u64) -> KeyState {
        match self.records.get(key) {
            Some(record) if now_ms.saturating_sub(record.shown_at_ms) < self.config.cooldown_ms() => {
                KeyState::Shown {
                    at_ms: record.shown_at_ms,
                }
            }
            _ => KeyState::Cool,
        }
    }

    /// Records still inside their cooldown as of the last decision.
    pub fn active_records(&self) -> usize {
        self.records.len()
    }

    fn prune(&mut self, now_ms: u64) {
        let cooldown = self.config.cooldown_ms();
        self.records
            .retain(|_, record| now_ms.saturating_sub(record.shown_at_ms) < cooldown);

        let window = self.config.rate_window_ms();
        while let Some(&shown_at) = self.recent_shows.front() {
            if now_ms.saturating_sub(shown_at) >= window {
                self.recent_shows.pop_front();
            } else {
                break;
            }
        }
    }
}
