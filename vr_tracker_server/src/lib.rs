pub mod mock;
#[cfg(feature = "openvr")]
pub mod openvr;
pub mod poller;
pub mod runtime;

use tokio::sync::mpsc;
use vr_tracker_common::config::PollConfig;
use vr_tracker_common::events::DisplayUpdate;

pub use poller::{PollSummary, Poller, StopReason};
pub use runtime::{open_session, RuntimeError, Session, VrRuntime};

/// Opens the configured runtime and starts polling it.
///
/// Runtime initialization failure is returned as-is; callers treat it as fatal.
pub fn start_polling(
    config: &PollConfig,
) -> anyhow::Result<(Poller, mpsc::Receiver<DisplayUpdate>)> {
    let session = open_session(config)?;
    let (sender, receiver) = mpsc::channel(config.channel_capacity.max(1));
    let poller = Poller::spawn(session, *config, sender)?;
    tracing::info!(
        "Polling started, channel capacity {}",
        config.channel_capacity.max(1)
    );
    Ok((poller, receiver))
}
