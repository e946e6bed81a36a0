use dioxus::{logger::tracing, prelude::*};
use vr_tracker_common::config::{poll_config_save, DelayPolicy};

use crate::styles;
use crate::tracker::{TrackerContext, TrackerLaunch};

fn describe_delay(delay: DelayPolicy) -> String {
    match delay {
        DelayPolicy::PerDevice { millis } => format!("{} ms after each device", millis),
        DelayPolicy::PerIteration { millis } => format!("{} ms after each sweep", millis),
        DelayPolicy::None => "none".to_owned(),
    }
}

#[component]
pub fn Settings() -> Element {
    let launch = use_context::<TrackerLaunch>();
    let tracker = use_context::<Signal<TrackerContext>>();
    let mut save_status = use_signal(|| None::<String>);

    let config = launch.config;
    let applied = (tracker().updates_applied)();
    let polling = launch.is_polling();

    rsx! {
        div {
            class: styles::PAGE_CONTAINER,
            h1 { class: styles::HEADING, "Settings" }

            table {
                class: styles::SETTINGS_TABLE,
                tbody {
                    tr { td { "Backend" } td { "{config.backend:?}" } }
                    tr { td { "Tracking universe" } td { "{config.universe:?}" } }
                    tr { td { "Poll delay" } td { "{describe_delay(config.delay)}" } }
                    tr { td { "Channel capacity" } td { "{config.channel_capacity}" } }
                    tr { td { "Poller" } td { if polling { "running" } else { "stopped" } } }
                    tr { td { "Updates applied" } td { "{applied}" } }
                }
            }

            p {
                class: styles::MUTED_TEXT,
                "Changes to poll_config.json take effect on the next start."
            }

            button {
                class: styles::BUTTON_PRIMARY,
                onclick: move |_| {
                    let status = match poll_config_save(&config) {
                        Ok(()) => "Saved current settings".to_owned(),
                        Err(e) => {
                            tracing::error!("Failed to save poll config: {}", e);
                            format!("Save failed: {}", e)
                        }
                    };
                    save_status.set(Some(status));
                },
                "Write config file"
            }

            if let Some(status) = save_status() {
                p { class: styles::MUTED_TEXT, "{status}" }
            }
        }
    }
}
