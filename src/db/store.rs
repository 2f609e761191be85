//! Append-only log boundary used by the pipeline.

use crate::db::models::{EventRecord, TipRecord};

use super::connection::Database;
use super::repositories::{events::insert_event, tips::insert_tip};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreRecord {
    Event(EventRecord),
    Tip(TipRecord),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("event store is closed")]
    Closed,
}

/// Implementations must not block the caller on disk I/O.
pub trait EventStore: Send + Sync {
    fn append(&self, record: StoreRecord) -> Result<(), StoreError>;
}

impl EventStore for Database {
    /// Each record is one INSERT, so a crash never leaves half a record.
    fn append(&self, record: StoreRecord) -> Result<(), StoreError> {
        let submitted = match record {
            StoreRecord::Event(event) => {
                self.submit("event insert", move |conn| insert_event(conn, &event).map(|_| ()))
            }
            StoreRecord::Tip(tip) => {
                self.submit("tip insert", move |conn| insert_tip(conn, &tip).map(|_| ()))
            }
        };
        submitted.map_err(|_| StoreError::Closed)
    }
}
