use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};
use vr_tracker_common::config::PollConfig;
use vr_tracker_common::device::{
    ControllerRole, DeviceClass, DeviceRecord, DeviceSlot, MAX_TRACKED_DEVICE_COUNT,
};
use vr_tracker_common::events::{DevicePose, DisplayGroup, DisplayUpdate};
use vr_tracker_common::pose::pose_from_transform;

use crate::runtime::VrRuntime;

/// What happened to an update handed to the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// The consumer is behind; this update was discarded.
    Dropped,
    /// The consumer is gone.
    Closed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IterationStats {
    pub connected: usize,
    pub delivered: usize,
    pub dropped: usize,
    pub closed: bool,
    pub cancelled: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StopReason {
    #[default]
    Cancelled,
    ChannelClosed,
    Panicked,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub iterations: u64,
    pub updates_sent: u64,
    pub updates_dropped: u64,
    pub stop_reason: StopReason,
}

/// Runs one sweep over every device slot, handing each displayable device's
/// update to `emit`.
///
/// Disconnected slots are skipped before any per-slot query. Devices that are
/// neither a headset, a left/right controller, nor a generic tracker produce
/// no update but still count toward the per-device delay.
pub fn poll_once<R, F>(
    runtime: &mut R,
    config: &PollConfig,
    cancel: &CancellationToken,
    mut emit: F,
) -> IterationStats
where
    R: VrRuntime + ?Sized,
    F: FnMut(DisplayUpdate) -> Delivery,
{
    let mut stats = IterationStats::default();
    let poses = runtime.device_poses(config.universe);

    for slot in 0..MAX_TRACKED_DEVICE_COUNT as DeviceSlot {
        if cancel.is_cancelled() {
            stats.cancelled = true;
            break;
        }
        if !runtime.is_device_connected(slot) {
            continue;
        }
        stats.connected += 1;

        let array_pose = poses.get(slot as usize).copied().unwrap_or_default();
        let record = device_record(runtime, slot, &array_pose);
        if let Some(update) = device_update(runtime, config, &record, &array_pose) {
            match emit(update) {
                Delivery::Delivered => stats.delivered += 1,
                Delivery::Dropped => stats.dropped += 1,
                Delivery::Closed => {
                    stats.closed = true;
                    break;
                }
            }
        }

        if let Some(delay) = config.delay.per_device() {
            thread::sleep(delay);
        }
    }

    stats
}

/// Reads a connected slot's class, plus the hand role for controllers.
fn device_record<R>(runtime: &R, slot: DeviceSlot, array_pose: &DevicePose) -> DeviceRecord
where
    R: VrRuntime + ?Sized,
{
    let class = runtime.device_class(slot);
    let role = match class {
        DeviceClass::Controller => runtime.controller_role(slot),
        _ => ControllerRole::Invalid,
    };
    DeviceRecord {
        slot,
        class,
        role,
        tracking_result: array_pose.tracking_result,
        connected: true,
    }
}

fn device_update<R>(
    runtime: &mut R,
    config: &PollConfig,
    record: &DeviceRecord,
    array_pose: &DevicePose,
) -> Option<DisplayUpdate>
where
    R: VrRuntime + ?Sized,
{
    let slot = record.slot;
    // Controllers report input state before the role decides whether they are shown.
    let state = match record.class {
        DeviceClass::Controller | DeviceClass::GenericTracker => {
            runtime.controller_state_with_pose(config.universe, slot)
        }
        _ => None,
    };

    let Some(group) = record.display_group() else {
        trace!(
            "Skipping slot {} of class {:?} with role {:?}",
            slot,
            record.class,
            record.role
        );
        return None;
    };

    let (pose, input) = match group {
        DisplayGroup::Hmd => (array_pose, None),
        DisplayGroup::LeftController | DisplayGroup::RightController => {
            (array_pose, state.map(|(input, _)| input))
        }
        // Trackers are positioned from the controller-state pose when the
        // runtime provides one; the status always comes from the pose array.
        DisplayGroup::GenericTracker => (
            state.as_ref().map(|(_, pose)| pose).unwrap_or(array_pose),
            None,
        ),
    };

    Some(DisplayUpdate {
        slot,
        group,
        pose: pose_from_transform(&pose.device_to_absolute),
        tracking_result: record.tracking_result,
        input,
    })
}

/// Calls [`VrRuntime::shutdown`] when the poll loop exits, including by panic.
struct ShutdownOnExit<R: VrRuntime>(R);

impl<R: VrRuntime> Drop for ShutdownOnExit<R> {
    fn drop(&mut self) {
        self.0.shutdown();
    }
}

fn run_poll_loop<R: VrRuntime>(
    runtime: R,
    config: PollConfig,
    sender: mpsc::Sender<DisplayUpdate>,
    cancel: CancellationToken,
) -> PollSummary {
    info!("Poll loop starting with {:?}", config.delay);
    let mut runtime = ShutdownOnExit(runtime);
    let mut summary = PollSummary::default();

    let stop_reason = loop {
        if cancel.is_cancelled() {
            break StopReason::Cancelled;
        }

        let stats = poll_once(&mut runtime.0, &config, &cancel, |update| {
            match sender.try_send(update) {
                Ok(()) => Delivery::Delivered,
                Err(TrySendError::Full(update)) => {
                    trace!("Update channel full, dropping update for slot {}", update.slot);
                    Delivery::Dropped
                }
                Err(TrySendError::Closed(_)) => Delivery::Closed,
            }
        });

        summary.iterations += 1;
        summary.updates_sent += stats.delivered as u64;
        summary.updates_dropped += stats.dropped as u64;

        if stats.closed {
            debug!("Update receiver dropped, stopping poll loop");
            break StopReason::ChannelClosed;
        }
        if stats.cancelled {
            break StopReason::Cancelled;
        }

        if let Some(delay) = config.delay.per_iteration() {
            thread::sleep(delay);
        }
    };

    summary.stop_reason = stop_reason;
    drop(runtime);
    info!(
        "Poll loop stopped ({:?}) after {} iterations, {} updates sent, {} dropped",
        summary.stop_reason, summary.iterations, summary.updates_sent, summary.updates_dropped
    );
    summary
}

/// Handle to the background poll thread.
///
/// The thread owns the runtime session and shuts it down after its last sweep,
/// so once [`Poller::stop`] or [`Poller::join`] returns the runtime is released.
pub struct Poller {
    cancel: CancellationToken,
    thread: JoinHandle<PollSummary>,
}

impl Poller {
    pub fn spawn<R>(
        runtime: R,
        config: PollConfig,
        sender: mpsc::Sender<DisplayUpdate>,
    ) -> std::io::Result<Self>
    where
        R: VrRuntime + 'static,
    {
        let cancel = CancellationToken::new();
        let thread = thread::Builder::new().name("vr-poller".into()).spawn({
            let cancel = cancel.clone();
            move || run_poll_loop(runtime, config, sender, cancel)
        })?;
        Ok(Self { cancel, thread })
    }

    /// Token that stops the loop when cancelled; hand it to other shutdown sources.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    pub fn stop(self) -> PollSummary {
        self.cancel.cancel();
        self.join()
    }

    /// Waits for the loop to end on its own (cancellation or a closed channel).
    pub fn join(self) -> PollSummary {
        match self.thread.join() {
            Ok(summary) => summary,
            Err(_) => {
                error!("Poll thread panicked");
                PollSummary {
                    stop_reason: StopReason::Panicked,
                    ..Default::default()
                }
            }
        }
    }
}
