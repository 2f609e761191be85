//! Tip display boundary. Implementations must return promptly and swallow
//! their own failures; the pipeline never waits on a toast.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::classifier::ActionLabel;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

pub trait Notifier: Send + Sync {
    fn show(&self, tip_text: &str, action: ActionLabel);
}

/// Writes tips to the log. Used when no display is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, tip_text: &str, action: ActionLabel) {
        log_info!("[tip] {} ({})", tip_text, action);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub tip_text: String,
    pub action: ActionLabel,
}

/// Hands tips to a bounded channel; a full or closed channel drops the toast.
#[derive(Clone)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<Toast>,
}

impl ChannelNotifier {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Toast>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn show(&self, tip_text: &str, action: ActionLabel) {
        let toast = Toast {
            tip_text: tip_text.to_string(),
            action,
        };
        match self.tx.try_send(toast) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(toast)) => {
                log_warn!("toast queue full, dropping tip for {}", toast.action);
            }
            Err(mpsc::error::TrySendError::Closed(toast)) => {
                log_warn!("toast worker gone, dropping tip for {}", toast.action);
            }
        }
    }
}

/// Displays queued toasts until every sender is dropped.
pub fn spawn_toast_worker(mut rx: mpsc::Receiver<Toast>, display: Box<dyn Notifier>) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut shown = 0;
        while let Some(toast) = rx.recv().await {
            display.show(&toast.tip_text, toast.action);
            shown += 1;
        }
        shown
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Notifier for Recorder {
        fn show(&self, tip_text: &str, _action: ActionLabel) {
            self.0.lock().unwrap().push(tip_text.to_string());
        }
    }

    #[tokio::test]
    async fn worker_displays_queued_toasts_in_order() {
        let (notifier, rx) = ChannelNotifier::new(8);
        let recorder = Recorder::default();
        let worker = spawn_toast_worker(rx, Box::new(recorder.clone()));

        notifier.show("Press Ctrl+C instead", ActionLabel::CopyViaContextMenu);
        notifier.show("Press Ctrl+S to save", ActionLabel::SaveViaToolbar);
        drop(notifier);

        assert_eq!(worker.await.unwrap(), 2);
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["Press Ctrl+C instead", "Press Ctrl+S to save"]
        );
    }

    #[tokio::test]
    async fn full_channel_drops_without_blocking() {
        let (notifier, mut rx) = ChannelNotifier::new(1);
        notifier.show("first", ActionLabel::UndoViaToolbar);
        notifier.show("second", ActionLabel::RedoViaToolbar);
        drop(notifier);

        assert_eq!(rx.recv().await.map(|t| t.tip_text), Some("first".to_string()));
        assert!(rx.recv().await.is_none());
    }
}
