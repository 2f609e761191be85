use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    RawEvents,
    /// Raw events the normalizer discarded (releases, repeats, unchanged clipboard).
    FilteredEvents,
    NormalizedEvents,
    Candidates,
    FastPath,
    NoShortcut,
    TipsShown,
    SuppressedCooldown,
    SuppressedRateLimit,
    BufferEvictions,
    QueueFullDrops,
    StoreFailures,
}

impl Counter {
    pub const COUNT: usize = 12;

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineCounters {
    pub raw_events: u64,
    pub filtered_events: u64,
    pub normalized_events: u64,
    pub candidates: u64,
    pub fast_path: u64,
    pub no_shortcut: u64,
    pub tips_shown: u64,
    pub suppressed_cooldown: u64,
    pub suppressed_rate_limit: u64,
    pub buffer_evictions: u64,
    pub queue_full_drops: u64,
    pub store_failures: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub cpu_percent: f32,
    pub memory_mb: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub captured_at: DateTime<Utc>,
    pub system: SystemMetrics,
    pub counters: PipelineCounters,
}
