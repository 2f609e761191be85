use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw events that may wait for the consumer before producers start dropping.
    pub queue_capacity: usize,
    /// Log and store suppressed tips, not just shown ones.
    pub log_suppressions: bool,
    /// Append every normalized event to the event store.
    pub persist_events: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            log_suppressions: true,
            persist_events: true,
        }
    }
}
