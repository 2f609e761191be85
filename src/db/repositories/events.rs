use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_label, to_i64, to_u64},
    models::EventRecord,
};

pub(crate) fn insert_event(conn: &Connection, record: &EventRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO events (
            run_id,
            recorded_at,
            timestamp_ms,
            category,
            app_context,
            window_title
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.run_id,
            record.recorded_at.to_rfc3339(),
            to_i64(record.timestamp_ms)?,
            record.category.as_str(),
            record.app_context,
            record.window_title,
        ],
    )
    .with_context(|| "failed to insert event")?;
    Ok(conn.last_insert_rowid())
}

impl Database {
    pub async fn insert_event(&self, record: &EventRecord) -> Result<i64> {
        let record = record.clone();
        self.execute(move |conn| insert_event(conn, &record)).await
    }

    /// Newest first.
    pub async fn recent_events(&self, limit: usize) -> Result<Vec<EventRecord>> {
        let limit = to_i64(limit as u64)?;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, run_id, recorded_at, timestamp_ms, category, app_context, window_title
                 FROM events
                 ORDER BY id DESC
                 LIMIT ?1",
            )?;

            let mut rows = stmt.query(params![limit])?;
            let mut events = Vec::new();
            while let Some(row) = rows.next()? {
                events.push(EventRecord {
                    id: Some(row.get(0)?),
                    run_id: row.get(1)?,
                    recorded_at: parse_datetime(&row.get::<_, String>(2)?, "recorded_at")?,
                    timestamp_ms: to_u64(row.get(3)?, "timestamp_ms")?,
                    category: parse_label(&row.get::<_, String>(4)?, "category")?,
                    app_context: row.get(5)?,
                    window_title: row.get(6)?,
                });
            }

            Ok(events)
        })
        .await
    }

    pub async fn count_events(&self) -> Result<u64> {
        self.execute(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
            to_u64(count, "count")
        })
        .await
    }
}
