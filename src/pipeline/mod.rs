//! Normalizer → classifier → resolver → debouncer, one raw event at a time.
//!
//! [`Pipeline`] owns every piece of order-sensitive state, including the
//! current [`AppContext`], and is driven by exactly one consumer task (see
//! [`PipelineController`]). Notifier and store calls are hand-offs that
//! never wait on I/O.

mod config;
mod controller;
mod loop_worker;

pub use config::PipelineConfig;
pub use controller::{InputSender, PipelineController};
pub use loop_worker::pipeline_loop;

use std::sync::Arc;

use crate::catalog::ShortcutCatalog;
use crate::classifier::{ActionClassifier, ActionLabel, ElementLocator, NullLocator, Verdict};
use crate::clock::Clock;
use crate::db::{EventRecord, EventStore, StoreRecord, TipRecord};
use crate::debounce::{Debouncer, Decision};
use crate::input::{AppContext, Normalizer, RawInputEvent};
use crate::metrics::{Counter, MetricsCollector};
use crate::notify::Notifier;
use crate::resolver::{ResolvedTip, TipResolver};
use crate::settings::CoachSettings;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The normalizer dropped the raw event.
    Filtered,
    /// Buffered, nothing recognised yet.
    Observed,
    FastPath,
    /// Recognised, but the catalog has no shortcut for it here.
    NoShortcut(ActionLabel),
    Suppressed {
        tip: ResolvedTip,
        decision: Decision,
    },
    Shown(ResolvedTip),
}

pub struct Pipeline {
    run_id: String,
    config: PipelineConfig,
    context: AppContext,
    normalizer: Normalizer,
    classifier: ActionClassifier,
    resolver: TipResolver,
    debouncer: Debouncer,
    notifier: Arc<dyn Notifier>,
    store: Option<Arc<dyn EventStore>>,
    metrics: MetricsCollector,
    seen_evictions: u64,
    debug: bool,
}

impl Pipeline {
    pub fn new(
        settings: &CoachSettings,
        catalog: Arc<ShortcutCatalog>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            config: settings.pipeline.clone(),
            context: AppContext::default(),
            normalizer: Normalizer::new(),
            classifier: ActionClassifier::with_locator(
                settings.classifier.clone(),
                Arc::new(NullLocator),
            ),
            resolver: TipResolver::new(catalog),
            debouncer: Debouncer::new(settings.debounce.clone(), clock),
            notifier,
            store: None,
            metrics: MetricsCollector::new(),
            seen_evictions: 0,
            debug: false,
        }
    }

    pub fn with_locator(mut self, locator: Arc<dyn ElementLocator>) -> Self {
        let config = self.classifier.config().clone();
        self.classifier = ActionClassifier::with_locator(config, locator);
        self.seen_evictions = 0;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn EventStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    /// Logs every outcome at info level instead of debug.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn handle(&mut self, raw: RawInputEvent) -> PipelineOutcome {
        self.metrics.incr(Counter::RawEvents);

        let Some(event) = self.normalizer.normalize(raw, &mut self.context) else {
            self.metrics.incr(Counter::FilteredEvents);
            return PipelineOutcome::Filtered;
        };
        self.metrics.incr(Counter::NormalizedEvents);

        if self.config.persist_events {
            self.append(StoreRecord::Event(EventRecord::from_event(&self.run_id, &event)));
        }

        let category = event.category;
        let verdict = self.classifier.observe(event, &self.context);

        let evictions = self.classifier.evictions();
        self.metrics
            .add(Counter::BufferEvictions, evictions - self.seen_evictions);
        self.seen_evictions = evictions;

        let outcome = match verdict {
            Verdict::Nothing => PipelineOutcome::Observed,
            Verdict::FastPath => {
                self.metrics.incr(Counter::FastPath);
                PipelineOutcome::FastPath
            }
            Verdict::Candidate(candidate) => {
                self.metrics.incr(Counter::Candidates);
                match self.resolver.resolve(&candidate) {
                    Some(tip) => self.gate(tip),
                    None => {
                        self.metrics.incr(Counter::NoShortcut);
                        PipelineOutcome::NoShortcut(candidate.action)
                    }
                }
            }
        };

        if self.debug {
            log_info!("[pipeline] {} -> {:?}", category, outcome);
        } else {
            log_debug!("[pipeline] {} -> {:?}", category, outcome);
        }
        outcome
    }

    fn gate(&mut self, tip: ResolvedTip) -> PipelineOutcome {
        let now_ms = self.debouncer.decision_time(&tip);
        let decision = self.debouncer.decide_at(tip.action, &tip.app_context, now_ms);

        match decision {
            Decision::Show => {
                self.notifier.show(&tip.tip_text, tip.action);
                self.metrics.incr(Counter::TipsShown);
                self.append(StoreRecord::Tip(TipRecord::from_decision(
                    &self.run_id,
                    &tip,
                    decision,
                    now_ms,
                )));
                PipelineOutcome::Shown(tip)
            }
            Decision::SuppressedCooldown { .. } | Decision::SuppressedRateLimit => {
                let counter = match decision {
                    Decision::SuppressedRateLimit => Counter::SuppressedRateLimit,
                    _ => Counter::SuppressedCooldown,
                };
                self.metrics.incr(counter);
                if self.config.log_suppressions {
                    log_info!(
                        "[pipeline] suppressed {} in {} ({})",
                        tip.action,
                        tip.app_context,
                        decision.as_str()
                    );
                    self.append(StoreRecord::Tip(TipRecord::from_decision(
                        &self.run_id,
                        &tip,
                        decision,
                        now_ms,
                    )));
                }
                PipelineOutcome::Suppressed { tip, decision }
            }
        }
    }

    fn append(&self, record: StoreRecord) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.append(record) {
            self.metrics.incr(Counter::StoreFailures);
            log_warn!("[pipeline] event store append failed: {err}");
        }
    }
}
