//! Persisted tip decisions, shown or suppressed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::ActionLabel;
use crate::debounce::Decision;
use crate::resolver::ResolvedTip;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipOutcome {
    Shown,
    SuppressedCooldown,
    SuppressedRateLimit,
}

impl TipOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipOutcome::Shown => "shown",
            TipOutcome::SuppressedCooldown => "suppressed_cooldown",
            TipOutcome::SuppressedRateLimit => "suppressed_rate_limit",
        }
    }
}

impl From<Decision> for TipOutcome {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Show => TipOutcome::Shown,
            Decision::SuppressedCooldown { .. } => TipOutcome::SuppressedCooldown,
            Decision::SuppressedRateLimit => TipOutcome::SuppressedRateLimit,
        }
    }
}

impl fmt::Display for TipOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TipOutcome {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "shown" => Ok(TipOutcome::Shown),
            "suppressed_cooldown" => Ok(TipOutcome::SuppressedCooldown),
            "suppressed_rate_limit" => Ok(TipOutcome::SuppressedRateLimit),
            other => Err(format!("unknown tip outcome '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipRecord {
    pub id: Option<i64>,
    pub run_id: String,
    pub recorded_at: DateTime<Utc>,
    pub timestamp_ms: u64,
    pub action: ActionLabel,
    pub app_context: String,
    pub key_combo: String,
    pub tip_text: String,
    pub outcome: TipOutcome,
}

impl TipRecord {
    pub fn from_decision(run_id: &str, tip: &ResolvedTip, decision: Decision, now_ms: u64) -> Self {
        Self {
            id: None,
            run_id: run_id.to_string(),
            recorded_at: Utc::now(),
            timestamp_ms: now_ms,
            action: tip.action,
            app_context: tip.app_context.clone(),
            key_combo: tip.key_combo.clone(),
            tip_text: tip.tip_text.clone(),
            outcome: decision.into(),
        }
    }
}

/// Per-label tally over every stored run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TipSummary {
    pub action: ActionLabel,
    pub shown: u64,
    pub suppressed: u64,
}
