use dioxus::prelude::*;
use vr_tracker_common::display::GroupFields;
use vr_tracker_common::events::DisplayGroup;

use crate::styles;

#[component]
fn Field(#[props(into)] label: String, value: String, #[props(default)] wide: bool) -> Element {
    rsx! {
        div {
            class: styles::FIELD_ROW,
            label { class: styles::FIELD_LABEL, "{label}" }
            input {
                class: if wide { styles::FIELD_WIDE } else { styles::FIELD },
                r#type: "text",
                readonly: true,
                value: "{value}",
            }
        }
    }
}

/// Read-only fields for one display group. Nothing is filled in until the
/// poller has reported a device for the group.
#[component]
pub fn DevicePanel(group: DisplayGroup, fields: GroupFields) -> Element {
    rsx! {
        section {
            class: if fields.is_populated() { styles::PANEL } else { styles::PANEL_IDLE },
            h2 { "{group.title()}" }

            Field { label: "Index", value: fields.index.clone() }
            Field { label: "X", value: fields.vector_x.clone() }
            Field { label: "Y", value: fields.vector_y.clone() }
            Field { label: "Z", value: fields.vector_z.clone() }
            Field { label: "qX", value: fields.quaternion_x.clone() }
            Field { label: "qY", value: fields.quaternion_y.clone() }
            Field { label: "qZ", value: fields.quaternion_z.clone() }
            Field { label: "qW", value: fields.quaternion_w.clone() }
            Field { label: "State", value: fields.state.clone(), wide: true }

            if let Some(input) = fields.input.as_ref() {
                Field { label: "Pressed", value: input.pressed.clone(), wide: true }
                Field { label: "Touched", value: input.touched.clone(), wide: true }
                for (label, value) in input.axis_fields() {
                    Field { key: "{label}", label: label.clone(), value: value.to_owned() }
                }
            }
        }
    }
}
