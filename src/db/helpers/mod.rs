use std::convert::TryFrom;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

pub fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn to_u64(value: i64, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("{field} contains negative value {value}"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

/// Parses a TEXT column holding one of our enum wire names.
pub fn parse_label<T>(value: &str, field: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|err: String| anyhow!("{field}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ActionLabel;

    #[test]
    fn integer_conversions_reject_out_of_range() {
        assert!(to_i64(u64::MAX).is_err());
        assert_eq!(to_i64(42).unwrap(), 42);
        assert!(to_u64(-1, "timestamp_ms").is_err());
    }

    #[test]
    fn labels_and_datetimes_round_trip() {
        let label: ActionLabel = parse_label("UNDO_VIA_TOOLBAR", "action_label").unwrap();
        assert_eq!(label, ActionLabel::UndoViaToolbar);
        assert!(parse_label::<ActionLabel>("UNDO", "action_label").is_err());

        let now = Utc::now();
        let parsed = parse_datetime(&now.to_rfc3339(), "recorded_at").unwrap();
        assert_eq!(parsed, now);
    }
}
