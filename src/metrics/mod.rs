mod types;

pub use types::{Counter, MetricsSnapshot, PipelineCounters, SystemMetrics};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::sync::Mutex;

/// Pipeline counters plus process CPU/RSS. Clones share state.
///
/// Counters are atomics so the synchronous pipeline can bump them; the
/// sysinfo handle sits behind an async mutex and is only touched on snapshot.
#[derive(Clone)]
pub struct MetricsCollector {
    counters: Arc<[AtomicU64; Counter::COUNT]>,
    system: Arc<Mutex<SystemState>>,
}

struct SystemState {
    system: System,
    pid: Pid,
}

impl MetricsCollector {
    pub fn new() -> Self {
        let mut system = System::new();
        let pid = Pid::from_u32(std::process::id());

        // Initial refresh to establish baseline for CPU calculation
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        Self {
            counters: Arc::new(std::array::from_fn(|_| AtomicU64::new(0))),
            system: Arc::new(Mutex::new(SystemState { system, pid })),
        }
    }

    pub fn incr(&self, counter: Counter) {
        self.add(counter, 1);
    }

    pub fn add(&self, counter: Counter, n: u64) {
        if n > 0 {
            self.counters[counter.index()].fetch_add(n, Ordering::Relaxed);
        }
    }

    pub fn get(&self, counter: Counter) -> u64 {
        self.counters[counter.index()].load(Ordering::Relaxed)
    }

    pub fn counters(&self) -> PipelineCounters {
        PipelineCounters {
            raw_events: self.get(Counter::RawEvents),
            filtered_events: self.get(Counter::FilteredEvents),
            normalized_events: self.get(Counter::NormalizedEvents),
            candidates: self.get(Counter::Candidates),
            fast_path: self.get(Counter::FastPath),
            no_shortcut: self.get(Counter::NoShortcut),
            tips_shown: self.get(Counter::TipsShown),
            suppressed_cooldown: self.get(Counter::SuppressedCooldown),
            suppressed_rate_limit: self.get(Counter::SuppressedRateLimit),
            buffer_evictions: self.get(Counter::BufferEvictions),
            queue_full_drops: self.get(Counter::QueueFullDrops),
            store_failures: self.get(Counter::StoreFailures),
        }
    }

    /// CPU usage needs two refreshes over time, so the first sample after
    /// startup reads close to zero.
    pub async fn sample_system_metrics(&self) -> SystemMetrics {
        let mut state = self.system.lock().await;
        let pid = state.pid;
        state.system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

        match state.system.process(pid) {
            Some(process) => SystemMetrics {
                cpu_percent: process.cpu_usage(),
                memory_mb: process.memory() as f64 / 1024.0 / 1024.0,
            },
            None => SystemMetrics::default(),
        }
    }

    pub async fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            captured_at: Utc::now(),
            system: self.sample_system_metrics().await,
            counters: self.counters(),
        }
    }

    pub fn reset(&self) {
        for counter in self.counters.iter() {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
