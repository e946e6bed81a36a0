use dioxus::prelude::*;
use vr_tracker_common::events::DisplayGroup;

use crate::components::DevicePanel;
use crate::styles;
use crate::tracker::TrackerContext;

#[component]
pub fn Home() -> Element {
    let tracker = use_context::<Signal<TrackerContext>>();
    let board = (tracker().board)();

    rsx! {
        div {
            class: styles::PAGE_CONTAINER,
            h1 { class: styles::HEADING, "Tracked Devices" }

            div {
                class: styles::PANEL_GRID,
                for group in DisplayGroup::ALL {
                    DevicePanel {
                        key: "{group:?}",
                        group,
                        fields: board.group(group).clone(),
                    }
                }
            }
        }
    }
}
