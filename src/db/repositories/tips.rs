use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_label, to_i64, to_u64},
    models::{TipRecord, TipSummary},
};

pub(crate) fn insert_tip(conn: &Connection, record: &TipRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO tips (
            run_id,
            recorded_at,
            timestamp_ms,
            action_label,
            app_context,
            key_combo,
            tip_text,
            outcome
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.run_id,
            record.recorded_at.to_rfc3339(),
            to_i64(record.timestamp_ms)?,
            record.action.as_str(),
            record.app_context,
            record.key_combo,
            record.tip_text,
            record.outcome.as_str(),
        ],
    )
    .with_context(|| "failed to insert tip")?;
    Ok(conn.last_insert_rowid())
}

impl Database {
    pub async fn insert_tip(&self, record: &TipRecord) -> Result<i64> {
        let record = record.clone();
        self.execute(move |conn| insert_tip(conn, &record)).await
    }

    /// Newest first.
    pub async fn recent_tips(&self, limit: usize) -> Result<Vec<TipRecord>> {
        let limit = to_i64(limit as u64)?;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, run_id, recorded_at, timestamp_ms, action_label, app_context,
                        key_combo, tip_text, outcome
                 FROM tips
                 ORDER BY id DESC
                 LIMIT ?1",
            )?;

            let mut rows = stmt.query(params![limit])?;
            let mut tips = Vec::new();
            while let Some(row) = rows.next()? {
                tips.push(TipRecord {
                    id: Some(row.get(0)?),
                    run_id: row.get(1)?,
                    recorded_at: parse_datetime(&row.get::<_, String>(2)?, "recorded_at")?,
                    timestamp_ms: to_u64(row.get(3)?, "timestamp_ms")?,
                    action: parse_label(&row.get::<_, String>(4)?, "action_label")?,
                    app_context: row.get(5)?,
                    key_combo: row.get(6)?,
                    tip_text: row.get(7)?,
                    outcome: parse_label(&row.get::<_, String>(8)?, "outcome")?,
                });
            }

            Ok(tips)
        })
        .await
    }

    /// Shown and suppressed counts per action label, most shown first.
    pub async fn tip_summary(&self) -> Result<Vec<TipSummary>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT action_label,
                        SUM(CASE WHEN outcome = 'shown' THEN 1 ELSE 0 END) AS shown,
                        SUM(CASE WHEN outcome = 'shown' THEN 0 ELSE 1 END) AS suppressed
                 FROM tips
                 GROUP BY action_label
                 ORDER BY shown DESC, action_label ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut summary = Vec::new();
            while let Some(row) = rows.next()? {
                summary.push(TipSummary {
                    action: parse_label(&row.get::<_, String>(0)?, "action_label")?,
                    shown: to_u64(row.get(1)?, "shown")?,
                    suppressed: to_u64(row.get(2)?, "suppressed")?,
                });
            }

            Ok(summary)
        })
        .await
    }
}
