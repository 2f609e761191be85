//! JSON-lines input source: one [`RawInputEvent`] per line.
//!
//! Stands in for the OS hooks. Each event is restamped onto the shared clock
//! as the replay start time plus its recorded offset, so the gaps the
//! classifier and debouncer see are the recorded ones whether or not the
//! replay is paced. Pacing only decides how long the source waits between
//! sends.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::pipeline::InputSender;

use super::types::RawInputEvent;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Longest real pause taken between two recorded events when pacing.
pub const MAX_REPLAY_GAP_MS: u64 = 30_000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub sent: usize,
    pub skipped: usize,
}

/// `None` for blank lines and `#` comments.
pub fn parse_line(line: &str) -> Option<serde_json::Result<RawInputEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(serde_json::from_str(trimmed))
}

pub async fn replay_lines<R>(
    reader: R,
    sender: &InputSender,
    clock: &dyn Clock,
    pace: bool,
    cancel_token: &CancellationToken,
) -> Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = ReplayStats::default();
    let mut previous_ts: Option<u64> = None;
    let mut timeline = Timeline::default();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await.context("failed to read replay input")? {
        line_no += 1;
        let event = match parse_line(&line) {
            None => continue,
            Some(Ok(event)) => event,
            Some(Err(err)) => {
                log_warn!("replay line {line_no} skipped: {err}");
                stats.skipped += 1;
                continue;
            }
        };

        if pace {
            let gap = previous_ts
                .map(|prev| event.timestamp_ms.saturating_sub(prev).min(MAX_REPLAY_GAP_MS))
                .unwrap_or(0);
            if gap > 0 {
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(gap)) => {}
                    _ = cancel_token.cancelled() => break,
                }
            }
        }
        if cancel_token.is_cancelled() {
            break;
        }
        previous_ts = Some(event.timestamp_ms);

        let restamped = RawInputEvent {
            timestamp_ms: timeline.stamp(event.timestamp_ms, clock),
            ..event
        };
        sender
            .send(restamped)
            .await
            .with_context(|| format!("replay stopped at line {line_no}"))?;
        stats.sent += 1;
    }

    log_info!(
        "replay finished: {} events sent, {} lines skipped",
        stats.sent,
        stats.skipped
    );
    Ok(stats)
}

/// Maps recorded timestamps onto the shared clock.
#[derive(Debug, Default)]
struct Timeline {
    /// (first recorded timestamp, clock time it was replayed at)
    origin: Option<(u64, u64)>,
    last_stamp: u64,
}

impl Timeline {
    /// Out-of-order recordings never move time backwards.
    fn stamp(&mut self, recorded_ms: u64, clock: &dyn Clock) -> u64 {
        let (first_recorded, base) = *self
            .origin
            .get_or_insert_with(|| (recorded_ms, clock.now_ms()));
        let stamp = (base + recorded_ms.saturating_sub(first_recorded)).max(self.last_stamp);
        self.last_stamp = stamp;
        stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ShortcutCatalog;
    use crate::clock::ManualClock;
    use crate::input::RawEventKind;
    use crate::notify::LogNotifier;
    use crate::pipeline::{Pipeline, PipelineController};
    use crate::settings::CoachSettings;
    use std::sync::Arc;

    #[test]
    fn parses_tagged_events_and_skips_comments() {
        assert!(parse_line("   ").is_none());
        assert!(parse_line("# recorded on a laptop").is_none());

        let event = parse_line(r#"{"timestamp_ms": 5, "kind": "mouse_down", "button": "Button.right", "x": 3, "y": 4}"#)
            .unwrap()
            .unwrap();
        assert_eq!(event.timestamp_ms, 5);
        assert_eq!(
            event.kind,
            RawEventKind::MouseDown {
                button: "Button.right".into(),
                x: 3,
                y: 4
            }
        );
        assert!(parse_line(r#"{"timestamp_ms": 5, "kind": "scroll"}"#)
            .unwrap()
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn replays_into_the_pipeline_and_skips_bad_lines() {
        let clock = ManualClock::new(42);
        let pipeline = Pipeline::new(
            &CoachSettings::default(),
            Arc::new(ShortcutCatalog::builtin().unwrap()),
            Arc::new(clock.clone()),
            Arc::new(LogNotifier),
        );
        let mut controller = PipelineController::new();
        let sender = controller.start(pipeline).unwrap();

        let input = concat!(
            "{\"timestamp_ms\": 0, \"kind\": \"focus_change\", \"app_name\": \"chrome.exe\", \"window_title\": \"Docs\"}\n",
            "not json\n",
            "\n",
            "{\"timestamp_ms\": 120000, \"kind\": \"key_down\", \"key\": \"Key.ctrl_l\"}\n",
            "{\"timestamp_ms\": 120050, \"kind\": \"key_up\", \"key\": \"Key.ctrl_l\"}\n",
        );
        let stats = replay_lines(
            input.as_bytes(),
            &sender,
            &clock,
            true,
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(stats, ReplayStats { sent: 3, skipped: 1 });

        drop(sender);
        let pipeline = controller.join().await.unwrap().unwrap();
        assert_eq!(pipeline.context().app_name, "chrome.exe");
        let counters = pipeline.metrics().counters();
        assert_eq!(counters.raw_events, 3);
        assert_eq!(counters.filtered_events, 1);
    }

    #[test]
    fn timeline_keeps_recorded_offsets() {
        let clock = ManualClock::new(10_000);
        let mut timeline = Timeline::default();
        assert_eq!(timeline.stamp(500_000, &clock), 10_000);
        clock.advance(3);
        assert_eq!(timeline.stamp(505_000, &clock), 15_000);
        assert_eq!(timeline.stamp(504_000, &clock), 15_000);
        assert_eq!(timeline.stamp(635_000, &clock), 145_000);
    }

    async fn replay_fast(input: &str) -> Pipeline {
        let clock = ManualClock::new(0);
        let pipeline = Pipeline::new(
            &CoachSettings::default(),
            Arc::new(ShortcutCatalog::builtin().unwrap()),
            Arc::new(clock.clone()),
            Arc::new(LogNotifier),
        );
        let mut controller = PipelineController::new();
        let sender = controller.start(pipeline).unwrap();
        replay_lines(input.as_bytes(), &sender, &clock, false, &CancellationToken::new())
            .await
            .unwrap();
        drop(sender);
        controller.join().await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn fast_replay_keeps_gaps_beyond_the_copy_window() {
        let input = concat!(
            "{\"timestamp_ms\": 0, \"kind\": \"focus_change\", \"app_name\": \"chrome\", \"window_title\": \"Docs\"}\n",
            "{\"timestamp_ms\": 100, \"kind\": \"mouse_down\", \"button\": \"Button.right\", \"x\": 1, \"y\": 1}\n",
            "{\"timestamp_ms\": 5100, \"kind\": \"clipboard_change\", \"content\": \"late\"}\n",
        );
        let pipeline = replay_fast(input).await;
        let counters = pipeline.metrics().counters();
        assert_eq!(counters.candidates, 0);
        assert_eq!(counters.tips_shown, 0);
    }

    #[tokio::test]
    async fn fast_replay_lets_the_cooldown_elapse() {
        let input = concat!(
            "{\"timestamp_ms\": 0, \"kind\": \"focus_change\", \"app_name\": \"chrome\", \"window_title\": \"Docs\"}\n",
            "{\"timestamp_ms\": 100, \"kind\": \"mouse_down\", \"button\": \"Button.right\", \"x\": 1, \"y\": 1}\n",
            "{\"timestamp_ms\": 300, \"kind\": \"clipboard_change\", \"content\": \"first\"}\n",
            "{\"timestamp_ms\": 130100, \"kind\": \"mouse_down\", \"button\": \"Button.right\", \"x\": 1, \"y\": 1}\n",
            "{\"timestamp_ms\": 130300, \"kind\": \"clipboard_change\", \"content\": \"second\"}\n",
        );
        let pipeline = replay_fast(input).await;
        let counters = pipeline.metrics().counters();
        assert_eq!(counters.candidates, 2);
        assert_eq!(counters.tips_shown, 2);
        assert_eq!(counters.suppressed_cooldown, 0);
    }

    #[tokio::test]
    async fn cancelled_replay_sends_nothing_more() {
        let clock = ManualClock::new(0);
        let pipeline = Pipeline::new(
            &CoachSettings::default(),
            Arc::new(ShortcutCatalog::builtin().unwrap()),
            Arc::new(clock.clone()),
            Arc::new(LogNotifier),
        );
        let mut controller = PipelineController::new();
        let sender = controller.start(pipeline).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let input = "{\"timestamp_ms\": 0, \"kind\": \"key_down\", \"key\": \"a\"}\n";
        let stats = replay_lines(input.as_bytes(), &sender, &clock, false, &cancel)
            .await
            .unwrap();
        assert_eq!(stats.sent, 0);
        controller.stop().await.unwrap();
    }
}
