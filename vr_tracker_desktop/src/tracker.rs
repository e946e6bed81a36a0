use std::sync::Arc;

use dioxus::{logger::tracing, prelude::*};
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use vr_tracker_common::config::PollConfig;
use vr_tracker_common::display::DisplayBoard;
use vr_tracker_common::events::DisplayUpdate;
use vr_tracker_server::Poller;

/// Largest batch of queued updates folded into the board per render.
const UPDATE_BATCH: usize = 64;

/// Handles created before the window opens and shared with the app through
/// the launch context. Both slots are emptied exactly once.
#[derive(Clone)]
pub struct TrackerLaunch {
    pub config: PollConfig,
    poller: Arc<Mutex<Option<Poller>>>,
    receiver: Arc<Mutex<Option<mpsc::Receiver<DisplayUpdate>>>>,
}

impl TrackerLaunch {
    pub fn new(config: PollConfig, poller: Poller, receiver: mpsc::Receiver<DisplayUpdate>) -> Self {
        Self {
            config,
            poller: Arc::new(Mutex::new(Some(poller))),
            receiver: Arc::new(Mutex::new(Some(receiver))),
        }
    }

    pub fn take_receiver(&self) -> Option<mpsc::Receiver<DisplayUpdate>> {
        self.receiver.lock().take()
    }

    pub fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .as_ref()
            .is_some_and(|poller| !poller.is_finished())
    }

    /// Cancels the poll thread and waits for it to release the runtime.
    /// Later calls are no-ops.
    pub fn stop_poller(&self) {
        let Some(poller) = self.poller.lock().take() else {
            return;
        };
        tracing::info!("Stopping tracker poller");
        let summary = poller.stop();
        tracing::info!(
            "Poller stopped ({:?}) after {} iterations, {} updates sent, {} dropped",
            summary.stop_reason,
            summary.iterations,
            summary.updates_sent,
            summary.updates_dropped
        );
    }
}

#[derive(Clone, Copy)]
pub struct TrackerContext {
    pub board: SyncSignal<DisplayBoard>,
    pub updates_applied: Signal<u64>,
}

impl TrackerContext {
    pub fn new() -> Self {
        Self {
            board: SyncSignal::new_maybe_sync(DisplayBoard::default()),
            updates_applied: Signal::new(0),
        }
    }

    /// Folds poller updates into the board until the poller closes its end.
    pub async fn run(&mut self, receiver: mpsc::Receiver<DisplayUpdate>) {
        let mut updates = ReceiverStream::new(receiver).ready_chunks(UPDATE_BATCH);
        while let Some(batch) = updates.next().await {
            tracing::trace!("Applying {} display updates", batch.len());
            {
                let mut board = self.board.write();
                for update in &batch {
                    board.apply(update);
                }
            }
            *self.updates_applied.write() += batch.len() as u64;
        }
        tracing::warn!("Tracker update stream ended");
    }
}
