use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::input::RawInputEvent;
use crate::metrics::{Counter, MetricsCollector};

use super::loop_worker::pipeline_loop;
use super::Pipeline;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Producer handle for the pipeline queue. Cheap to clone; one per input
/// source.
#[derive(Clone)]
pub struct InputSender {
    tx: mpsc::Sender<RawInputEvent>,
    metrics: MetricsCollector,
}

impl InputSender {
    /// Never blocks. Returns false when the event was dropped because the
    /// queue is full or the pipeline has stopped.
    pub fn push(&self, raw: RawInputEvent) -> bool {
        match self.tx.try_send(raw) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.metrics.incr(Counter::QueueFullDrops);
                log_warn!("input queue full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Waits for queue space. For sources that may apply backpressure, such
    /// as replay.
    pub async fn send(&self, raw: RawInputEvent) -> Result<()> {
        self.tx
            .send(raw)
            .await
            .map_err(|_| anyhow::anyhow!("pipeline is not running"))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub struct PipelineController {
    handle: Option<JoinHandle<Pipeline>>,
    cancel_token: Option<CancellationToken>,
}

impl PipelineController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(&mut self, pipeline: Pipeline) -> Result<InputSender> {
        if self.handle.is_some() {
            bail!("pipeline already running");
        }

        let capacity = pipeline.config().queue_capacity.max(1);
        let metrics = pipeline.metrics().clone();
        let (tx, rx) = mpsc::channel(capacity);

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(pipeline_loop(pipeline, rx, cancel_token.clone()));
        log_info!("pipeline started with queue capacity {capacity}");

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(InputSender { tx, metrics })
    }

    /// Cancels the loop, waits for it to drain the queue, and hands the
    /// pipeline back. `None` when it was not running.
    pub async fn stop(&mut self) -> Result<Option<Pipeline>> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        match self.handle.take() {
            Some(handle) => handle
                .await
                .context("pipeline loop task failed to join")
                .map(Some),
            None => Ok(None),
        }
    }

    /// Waits for the loop to end on its own, i.e. once every sender is gone.
    pub async fn join(&mut self) -> Result<Option<Pipeline>> {
        self.cancel_token = None;
        match self.handle.take() {
            Some(handle) => handle
                .await
                .context("pipeline loop task failed to join")
                .map(Some),
            None => Ok(None),
        }
    }
}

impl Default for PipelineController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ShortcutCatalog;
    use crate::clock::ManualClock;
    use crate::notify::LogNotifier;
    use crate::settings::CoachSettings;
    use std::sync::Arc;

    fn pipeline(queue_capacity: usize) -> Pipeline {
        let mut settings = CoachSettings::default();
        settings.pipeline.queue_capacity = queue_capacity;
        Pipeline::new(
            &settings,
            Arc::new(ShortcutCatalog::builtin().unwrap()),
            Arc::new(ManualClock::new(0)),
            Arc::new(LogNotifier),
        )
    }

    #[tokio::test]
    async fn stop_drains_queued_events() {
        let mut controller = PipelineController::new();
        let sender = controller.start(pipeline(64)).unwrap();
        assert!(controller.start(pipeline(64)).is_err());

        for i in 0..20 {
            assert!(sender.push(RawInputEvent::key_down(i, "a")));
        }
        let pipeline = controller.stop().await.unwrap().unwrap();
        assert_eq!(pipeline.metrics().counters().raw_events, 20);
        assert!(!controller.is_running());

        assert!(!sender.push(RawInputEvent::key_down(99, "a")));
        assert!(sender.is_closed());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn full_queue_drops_and_counts() {
        let mut controller = PipelineController::new();
        let sender = controller.start(pipeline(2)).unwrap();

        // The consumer cannot run until this task yields, so the queue fills.
        let accepted = (0..5)
            .filter(|&i| sender.push(RawInputEvent::key_down(i, "a")))
            .count();
        assert_eq!(accepted, 2);

        let pipeline = controller.stop().await.unwrap().unwrap();
        let counters = pipeline.metrics().counters();
        assert_eq!(counters.queue_full_drops, 3);
        assert_eq!(counters.raw_events, 2);
    }

    #[tokio::test]
    async fn loop_ends_when_every_sender_is_dropped() {
        let mut controller = PipelineController::new();
        let sender = controller.start(pipeline(8)).unwrap();
        sender.send(RawInputEvent::focus(0, "code", "main.rs")).await.unwrap();
        drop(sender);

        let pipeline = controller.join().await.unwrap().unwrap();
        assert_eq!(pipeline.context().app_name, "code");
    }
}
