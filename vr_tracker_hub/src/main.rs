use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use vr_tracker_common::display::{DisplayBoard, GroupFields};
use vr_tracker_common::events::{DisplayGroup, DisplayUpdate};

const SUMMARY_INTERVAL: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_env_var("RUST_LOG")
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = vr_tracker_common::config::poll_config()
        .map_err(|e| anyhow::anyhow!("Failed to load poll config: {}", e))?;
    tracing::info!("Poll config: {:?}", config);

    let (poller, receiver) = match vr_tracker_server::start_polling(&config) {
        Ok(started) => started,
        Err(e) => {
            tracing::error!("Failed to start tracking: {}", e);
            return Err(e);
        }
    };

    let cancel_token = poller.cancel_token();
    tokio::spawn({
        let cancel_token = cancel_token.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl-c: {}", e);
            }
            tracing::info!("Stopping...");
            cancel_token.cancel();
        }
    });

    // The poller drops its sender when it stops, which ends this loop.
    handle_updates(receiver, cancel_token).await;

    let summary = tokio::task::spawn_blocking(move || poller.stop()).await?;
    tracing::info!("Poller exited with: {:?}", summary);
    Ok(())
}

async fn handle_updates(mut receiver: mpsc::Receiver<DisplayUpdate>, cancel_token: CancellationToken) {
    let mut board = DisplayBoard::default();
    let mut summary = tokio::time::interval(SUMMARY_INTERVAL);
    summary.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            update = receiver.recv() => match update {
                Some(update) => {
                    tracing::debug!(
                        "slot {} {:?}: position {:?} orientation {:?}",
                        update.slot,
                        update.group,
                        update.pose.position,
                        update.pose.orientation
                    );
                    board.apply(&update);
                }
                None => {
                    tracing::info!("Update channel closed");
                    break;
                }
            },
            _ = summary.tick() => log_board(&board),
            _ = cancel_token.cancelled() => {
                // Drain whatever the poller managed to send before it saw the cancel.
                while let Ok(update) = receiver.try_recv() {
                    board.apply(&update);
                }
                log_board(&board);
                break;
            }
        }
    }
}

fn log_board(board: &DisplayBoard) {
    for group in DisplayGroup::ALL {
        let fields = board.group(group);
        if fields.is_populated() {
            tracing::info!("{}", describe(group, fields));
        }
    }
}

fn describe(group: DisplayGroup, f: &GroupFields) -> String {
    let mut line = format!(
        "{} [{}] pos ({}, {}, {}) quat (w {}, x {}, y {}, z {}) {}",
        group.title(),
        f.index,
        f.vector_x,
        f.vector_y,
        f.vector_z,
        f.quaternion_w,
        f.quaternion_x,
        f.quaternion_y,
        f.quaternion_z,
        f.state
    );
    if let Some(input) = &f.input {
        line.push_str(&format!(
            " pressed {} touched {} axis0 ({}, {}) axis1 ({}, {})",
            input.pressed,
            input.touched,
            input.axes[0].x,
            input.axes[0].y,
            input.axes[1].x,
            input.axes[1].y
        ));
    }
    line
}
