use serde::{Deserialize, Serialize};

/// Timing and size bounds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Max gap between a right-click and the clipboard change it caused.
    pub window_ms: u64,

    /// Max gap between opening a context menu and picking an item from it.
    pub menu_window_ms: u64,

    /// Buffer capacity; the oldest entry is evicted beyond this.
    pub max_events: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            window_ms: 1_000,
            menu_window_ms: 5_000,
            max_events: 32,
        }
    }
}

impl ClassifierConfig {
    /// How long an event stays in the buffer.
    pub fn horizon_ms(&self) -> u64 {
        self.window_ms.max(self.menu_window_ms)
    }
}
