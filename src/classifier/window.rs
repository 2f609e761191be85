use std::collections::VecDeque;

use crate::input::NormalizedEvent;

use super::locator::RegionLabel;

/// A buffered event plus what the locator reported under it (clicks only).
#[derive(Debug, Clone, PartialEq)]
pub struct BufferedEvent {
    pub event: NormalizedEvent,
    pub region: Option<RegionLabel>,
}

/// Sliding buffer bounded by entry count and by age relative to the newest
/// entry.
#[derive(Debug)]
pub struct EventWindow {
    entries: VecDeque<BufferedEvent>,
    max_events: usize,
    horizon_ms: u64,
    evicted: u64,
}

impl EventWindow {
    pub fn new(max_events: usize, horizon_ms: u64) -> Self {
        let max_events = max_events.max(2);
        Self {
            entries: VecDeque::with_capacity(max_events),
            max_events,
            horizon_ms,
            evicted: 0,
        }
    }

    /// Appends an entry. Returns how many entries were evicted for capacity;
    /// entries that merely aged out are not counted.
    pub fn push(&mut self, entry: BufferedEvent) -> u64 {
        let now = entry.event.timestamp_ms;
        while let Some(front) = self.entries.front() {
            if now.saturating_sub(front.event.timestamp_ms) > self.horizon_ms {
                self.entries.pop_front();
            } else {
                break;
            }
        }

        let mut evicted_now = 0;
        while self.entries.len() >= self.max_events {
            self.entries.pop_front();
            evicted_now += 1;
        }
        self.evicted += evicted_now;

        self.entries.push_back(entry);
        evicted_now
    }

    pub fn entries(&self) -> &VecDeque<BufferedEvent> {
        &self.entries
    }

    pub fn last(&self) -> Option<&BufferedEvent> {
        self.entries.back()
    }

    /// Removes every entry up to and including `index`.
    pub fn drain_through(&mut self, index: usize) -> Vec<BufferedEvent> {
        let end = (index + 1).min(self.entries.len());
        self.entries.drain(..end).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn evictions(&self) -> u64 {
        self.evicted
    }
}
