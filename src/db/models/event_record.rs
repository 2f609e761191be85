//! Persisted form of a normalized input event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::input::{EventCategory, NormalizedEvent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Option<i64>,
    pub run_id: String,
    pub recorded_at: DateTime<Utc>,
    pub timestamp_ms: u64,
    pub category: EventCategory,
    pub app_context: String,
    pub window_title: String,
}

impl EventRecord {
    /// Drops everything a normalized event carries beyond category and app.
    pub fn from_event(run_id: &str, event: &NormalizedEvent) -> Self {
        Self {
            id: None,
            run_id: run_id.to_string(),
            recorded_at: Utc::now(),
            timestamp_ms: event.timestamp_ms,
            category: event.category,
            app_context: event.app_context.clone(),
            window_title: event.window_title.clone(),
        }
    }
}
