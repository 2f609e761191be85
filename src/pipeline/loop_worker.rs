use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::input::RawInputEvent;

use super::Pipeline;

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Single consumer of the input queue. On cancellation the queue is closed
/// and whatever is already in it is still processed, in order.
pub async fn pipeline_loop(
    mut pipeline: Pipeline,
    mut rx: mpsc::Receiver<RawInputEvent>,
    cancel_token: CancellationToken,
) -> Pipeline {
    log_info!("pipeline loop started (run {})", pipeline.run_id());

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                rx.close();
                let mut drained = 0usize;
                while let Some(raw) = rx.recv().await {
                    pipeline.handle(raw);
                    drained += 1;
                }
                log_info!("pipeline loop shutting down, drained {drained} queued events");
                break;
            }
            next = rx.recv() => match next {
                Some(raw) => {
                    pipeline.handle(raw);
                }
                None => {
                    log_info!("all input sources closed, pipeline loop exiting");
                    break;
                }
            }
        }
    }

    pipeline
}
