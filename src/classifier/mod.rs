//! Event-to-action classifier.
//!
//! Buffers normalized events and, on every new event, runs the ordered rule
//! list against the buffer suffix. The first matching rule wins and its
//! evidence (plus everything older) leaves the buffer, so overlapping events
//! never trigger twice.

pub mod action;
pub mod config;
pub mod locator;
pub mod rules;
pub mod window;

use std::sync::Arc;

pub use action::{ActionCandidate, ActionLabel};
pub use config::ClassifierConfig;
pub use locator::{ElementLocator, NullLocator, RegionLabel};
pub use rules::{default_rules, PatternRule, RuleMatch, SelectionState};
pub use window::{BufferedEvent, EventWindow};

use crate::input::{normalize_app_key, AppContext, EventCategory, NormalizedEvent};

const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// What one observed event amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Nothing,
    /// A fast-path shortcut; deliberately not a candidate.
    FastPath,
    Candidate(ActionCandidate),
}

impl Verdict {
    pub fn into_candidate(self) -> Option<ActionCandidate> {
        match self {
            Verdict::Candidate(candidate) => Some(candidate),
            _ => None,
        }
    }
}

pub struct ActionClassifier {
    config: ClassifierConfig,
    rules: Vec<PatternRule>,
    window: EventWindow,
    selection: SelectionState,
    locator: Arc<dyn ElementLocator>,
}

impl ActionClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self::with_locator(config, Arc::new(NullLocator))
    }

    pub fn with_locator(config: ClassifierConfig, locator: Arc<dyn ElementLocator>) -> Self {
        Self::with_rules(config, default_rules(), locator)
    }

    pub fn with_rules(
        config: ClassifierConfig,
        rules: Vec<PatternRule>,
        locator: Arc<dyn ElementLocator>,
    ) -> Self {
        let window = EventWindow::new(config.max_events, config.horizon_ms());
        Self {
            config,
            rules,
            window,
            selection: SelectionState::default(),
            locator,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn evictions(&self) -> u64 {
        self.window.evictions()
    }

    pub fn buffered(&self) -> usize {
        self.window.len()
    }

    pub fn observe(&mut self, event: NormalizedEvent, context: &AppContext) -> Verdict {
        if event.category == EventCategory::FocusChanged {
            // evidence never spans two applications
            let switched_app = self
                .window
                .last()
                .map(|last| normalize_app_key(&last.event.app_context) != context.key())
                .unwrap_or(false);
            if switched_app {
                self.window.clear();
            }
            if self.selection.last_cell.is_some() && self.selection.app_key != context.key() {
                self.selection = SelectionState::default();
            }
            return Verdict::Nothing;
        }

        let region = match event.position {
            Some((x, y)) if event.category.is_click() => {
                self.locator.locate(x, y, &context.app_name)
            }
            _ => None,
        };

        let selected_cell = match &region {
            Some(RegionLabel::Cell { column, row })
                if event.category == EventCategory::LeftClick && !event.modifiers.any() =>
            {
                Some((column.clone(), *row))
            }
            _ => None,
        };

        let evicted = self.window.push(BufferedEvent { event, region });
        if evicted > 0 {
            log_debug!(
                "classifier buffer full, evicted {} oldest event(s) ({} total)",
                evicted,
                self.window.evictions()
            );
        }

        let matched = self.rules.iter().find_map(|rule| {
            rule.evaluate(&self.window, context, &self.config, &self.selection)
                .map(|found| (rule.name(), found))
        });
        if selected_cell.is_some() {
            self.selection = SelectionState {
                app_key: context.key(),
                last_cell: selected_cell,
            };
        }
        let Some((rule_name, found)) = matched else {
            return Verdict::Nothing;
        };

        let newest = found.evidence().iter().copied().max().unwrap_or(0);
        let consumed = self.window.drain_through(newest);

        match found {
            RuleMatch::FastPath { .. } => {
                log_debug!("{} matched; fast path, no tip", rule_name);
                Verdict::FastPath
            }
            RuleMatch::Emit { action, evidence } => {
                let evidence: Vec<NormalizedEvent> = evidence
                    .iter()
                    .filter_map(|&index| consumed.get(index))
                    .map(|entry| entry.event.clone())
                    .collect();
                let detected_at_ms = evidence
                    .last()
                    .map(|event| event.timestamp_ms)
                    .unwrap_or_default();
                log_debug!("{} matched {} in {}", rule_name, action, context.app_name);
                Verdict::Candidate(ActionCandidate {
                    action,
                    app_context: context.app_name.clone(),
                    evidence,
                    detected_at_ms,
                })
            }
        }
    }
}
