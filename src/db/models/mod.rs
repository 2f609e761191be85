pub mod event_record;
pub mod tip_record;

pub use event_record::EventRecord;
pub use tip_record::{TipOutcome, TipRecord, TipSummary};
