mod connection;
mod helpers;
mod migrations;
pub mod models;
mod repositories;
mod store;

pub use connection::Database;
pub use models::{EventRecord, TipOutcome, TipRecord, TipSummary};
pub use store::{EventStore, StoreError, StoreRecord};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ActionLabel;
    use crate::debounce::Decision;
    use crate::input::{EventCategory, Modifiers, NormalizedEvent};
    use crate::resolver::ResolvedTip;

    fn open(dir: &tempfile::TempDir) -> Database {
        Database::new(dir.path().join("coach.db")).expect("open database")
    }

    fn event(ts: u64, category: EventCategory) -> NormalizedEvent {
        NormalizedEvent {
            timestamp_ms: ts,
            category,
            app_context: "chrome.exe".into(),
            window_title: "Inbox".into(),
            modifiers: Modifiers::default(),
            position: Some((10, 20)),
        }
    }

    fn tip(action: ActionLabel) -> ResolvedTip {
        ResolvedTip {
            action,
            app_context: "chrome.exe".into(),
            matched_context: "*".into(),
            key_combo: "Ctrl+C".into(),
            tip_text: "Press Ctrl+C instead".into(),
            detected_at_ms: 0,
        }
    }

    #[tokio::test]
    async fn appended_records_are_visible_after_flush() {
        let dir = tempfile::tempdir().unwrap();
        let db = open(&dir);

        db.append(StoreRecord::Event(EventRecord::from_event(
            "run-1",
            &event(100, EventCategory::RightClick),
        )))
        .unwrap();
        db.append(StoreRecord::Event(EventRecord::from_event(
            "run-1",
            &event(300, EventCategory::ClipboardChanged),
        )))
        .unwrap();
        db.append(StoreRecord::Tip(TipRecord::from_decision(
            "run-1",
            &tip(ActionLabel::CopyViaContextMenu),
            Decision::Show,
            300,
        )))
        .unwrap();
        db.flush().await.unwrap();

        let events = db.recent_events(10).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].category, EventCategory::ClipboardChanged);
        assert_eq!(events[1].timestamp_ms, 100);
        assert_eq!(events[1].window_title, "Inbox");

        let tips = db.recent_tips(10).await.unwrap();
        assert_eq!(tips.len(), 1);
        assert_eq!(tips[0].outcome, TipOutcome::Shown);
        assert_eq!(tips[0].run_id, "run-1");
    }

    #[tokio::test]
    async fn summary_counts_shown_and_suppressed() {
        let dir = tempfile::tempdir().unwrap();
        let db = open(&dir);
        let copy = tip(ActionLabel::CopyViaContextMenu);
        let save = tip(ActionLabel::SaveViaToolbar);

        for (tip, decision) in [
            (&copy, Decision::Show),
            (&copy, Decision::SuppressedCooldown { remaining_ms: 1 }),
            (&copy, Decision::SuppressedRateLimit),
            (&save, Decision::Show),
            (&copy, Decision::Show),
        ] {
            db.insert_tip(&TipRecord::from_decision("run", tip, decision, 0))
                .await
                .unwrap();
        }

        let summary = db.tip_summary().await.unwrap();
        assert_eq!(
            summary,
            vec![
                TipSummary {
                    action: ActionLabel::CopyViaContextMenu,
                    shown: 2,
                    suppressed: 2,
                },
                TipSummary {
                    action: ActionLabel::SaveViaToolbar,
                    shown: 1,
                    suppressed: 0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn close_drains_pending_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coach.db");
        {
            let db = Database::new(path.clone()).unwrap();
            for ts in 0..50 {
                db.append(StoreRecord::Event(EventRecord::from_event(
                    "run",
                    &event(ts, EventCategory::LeftClick),
                )))
                .unwrap();
            }
            db.close();
            assert!(matches!(
                db.append(StoreRecord::Event(EventRecord::from_event(
                    "run",
                    &event(99, EventCategory::LeftClick),
                ))),
                Err(StoreError::Closed)
            ));
        }

        let reopened = Database::new(path).unwrap();
        assert_eq!(reopened.count_events().await.unwrap(), 50);
    }
}
