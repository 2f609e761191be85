use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Quiet period per (action, app) after a tip was shown.
    pub cooldown_secs: u64,
    /// Max tips across all keys per rolling window. 0 turns the cap off.
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 120,
            rate_limit_max: 3,
            rate_limit_window_secs: 60,
        }
    }
}

impl DebounceConfig {
    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_secs.saturating_mul(1000)
    }

    pub fn rate_window_ms(&self) -> u64 {
        self.rate_limit_window_secs.saturating_mul(1000)
    }
}
