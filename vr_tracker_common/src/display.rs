//! Text-field model behind the tracker window.
//!
//! Every group is a fixed set of named fields that an incoming
//! [`DisplayUpdate`] overwrites wholesale; the GUI only ever reads strings.

use crate::device::tracking_status_label;
use crate::events::{ControllerInput, DisplayGroup, DisplayUpdate, CONTROLLER_AXIS_COUNT};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AxisFields {
    pub x: String,
    pub y: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputFields {
    pub pressed: String,
    pub touched: String,
    pub axes: [AxisFields; CONTROLLER_AXIS_COUNT],
}

impl InputFields {
    fn from_input(input: &ControllerInput) -> Self {
        Self {
            pressed: format!("{}", input.button_pressed),
            touched: format!("{}", input.button_touched),
            axes: input.axes.map(|axis| AxisFields {
                x: fixed4(axis.x as f64),
                y: fixed4(axis.y as f64),
            }),
        }
    }

    /// One `(label, value)` pair per axis component, `Axis0 X` through `Axis4 Y`.
    pub fn axis_fields(&self) -> Vec<(String, &str)> {
        self.axes
            .iter()
            .enumerate()
            .flat_map(|(i, axis)| {
                [
                    (format!("Axis{} X", i), axis.x.as_str()),
                    (format!("Axis{} Y", i), axis.y.as_str()),
                ]
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupFields {
    pub index: String,
    pub vector_x: String,
    pub vector_y: String,
    pub vector_z: String,
    pub quaternion_x: String,
    pub quaternion_y: String,
    pub quaternion_z: String,
    pub quaternion_w: String,
    pub state: String,
    /// `None` for the HMD and tracker groups.
    pub input: Option<InputFields>,
}

impl GroupFields {
    fn for_group(group: DisplayGroup) -> Self {
        Self {
            input: group.is_controller().then(InputFields::default),
            ..Default::default()
        }
    }

    /// Whether any update has landed in this group yet.
    pub fn is_populated(&self) -> bool {
        !self.index.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayBoard {
    pub hmd: GroupFields,
    pub left: GroupFields,
    pub right: GroupFields,
    pub tracker: GroupFields,
}

impl Default for DisplayBoard {
    fn default() -> Self {
        Self {
            hmd: GroupFields::for_group(DisplayGroup::Hmd),
            left: GroupFields::for_group(DisplayGroup::LeftController),
            right: GroupFields::for_group(DisplayGroup::RightController),
            tracker: GroupFields::for_group(DisplayGroup::GenericTracker),
        }
    }
}

impl DisplayBoard {
    pub fn group(&self, group: DisplayGroup) -> &GroupFields {
        match group {
            DisplayGroup::Hmd => &self.hmd,
            DisplayGroup::LeftController => &self.left,
            DisplayGroup::RightController => &self.right,
            DisplayGroup::GenericTracker => &self.tracker,
        }
    }

    fn group_mut(&mut self, group: DisplayGroup) -> &mut GroupFields {
        match group {
            DisplayGroup::Hmd => &mut self.hmd,
            DisplayGroup::LeftController => &mut self.left,
            DisplayGroup::RightController => &mut self.right,
            DisplayGroup::GenericTracker => &mut self.tracker,
        }
    }

    pub fn apply(&mut self, update: &DisplayUpdate) {
        let position = update.pose.position;
        let orientation = update.pose.orientation;
        let fields = self.group_mut(update.group);

        fields.index = format!("{}", update.slot);
        fields.vector_x = fixed4(position.x);
        fields.vector_y = fixed4(position.y);
        fields.vector_z = fixed4(position.z);
        fields.quaternion_x = fixed4(orientation.i);
        fields.quaternion_y = fixed4(orientation.j);
        fields.quaternion_z = fixed4(orientation.k);
        fields.quaternion_w = fixed4(orientation.w);
        fields.state = tracking_status_label(update.tracking_result).to_owned();

        if update.group.is_controller() {
            fields.input = Some(
                update
                    .input
                    .as_ref()
                    .map(InputFields::from_input)
                    .unwrap_or_default(),
            );
        }
    }
}

fn fixed4(value: f64) -> String {
    format!("{:.4}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ControllerAxis, Pose};
    use nalgebra::{Quaternion, Vector3};

    fn update(group: DisplayGroup, input: Option<ControllerInput>) -> DisplayUpdate {
        DisplayUpdate {
            slot: 3,
            group,
            pose: Pose {
                position: Vector3::new(1.0, -0.25, 0.123456),
                orientation: Quaternion::new(0.5, -0.5, 0.5, 0.5),
            },
            tracking_result: 200,
            input,
        }
    }

    #[test]
    fn test_hmd_fields_are_fixed_four_decimals() {
        let mut board = DisplayBoard::default();
        board.apply(&update(DisplayGroup::Hmd, None));

        let hmd = &board.hmd;
        assert_eq!(hmd.index, "3");
        assert_eq!(hmd.vector_x, "1.0000");
        assert_eq!(hmd.vector_y, "-0.2500");
        assert_eq!(hmd.vector_z, "0.1235");
        assert_eq!(hmd.quaternion_x, "-0.5000");
        assert_eq!(hmd.quaternion_y, "0.5000");
        assert_eq!(hmd.quaternion_z, "0.5000");
        assert_eq!(hmd.quaternion_w, "0.5000");
        assert_eq!(hmd.state, "Running_OK");
        assert!(hmd.input.is_none());
        assert!(!board.left.is_populated());
        assert!(!board.tracker.is_populated());
    }

    #[test]
    fn test_controller_input_fields() {
        let mut axes = [ControllerAxis::default(); CONTROLLER_AXIS_COUNT];
        axes[0] = ControllerAxis { x: 0.5, y: -1.0 };
        axes[4] = ControllerAxis { x: 0.25, y: 0.0 };
        let input = ControllerInput {
            packet_num: 9,
            button_pressed: 1 << 33,
            button_touched: 4,
            axes,
        };

        let mut board = DisplayBoard::default();
        board.apply(&update(DisplayGroup::RightController, Some(input)));

        assert!(!board.left.is_populated());
        let fields = board.right.input.as_ref().unwrap();
        assert_eq!(fields.pressed, "8589934592");
        assert_eq!(fields.touched, "4");
        assert_eq!(fields.axes[0].x, "0.5000");
        assert_eq!(fields.axes[0].y, "-1.0000");
        assert_eq!(fields.axes[1].x, "0.0000");
        assert_eq!(fields.axes[4].x, "0.2500");
    }

    #[test]
    fn test_controller_without_input_clears_input_fields() {
        let mut board = DisplayBoard::default();
        let input = ControllerInput {
            button_pressed: 7,
            ..Default::default()
        };
        board.apply(&update(DisplayGroup::LeftController, Some(input)));
        board.apply(&update(DisplayGroup::LeftController, None));

        assert_eq!(board.left.input, Some(InputFields::default()));
        assert_eq!(board.left.index, "3");
    }

    #[test]
    fn test_unknown_state_is_blank() {
        let mut board = DisplayBoard::default();
        let mut u = update(DisplayGroup::GenericTracker, None);
        u.tracking_result = 300;
        board.apply(&u);
        assert_eq!(board.tracker.state, "");
        assert!(board.tracker.is_populated());
    }

    #[test]
    fn test_axis_fields_are_separate_components() {
        let mut input = InputFields::default();
        input.axes[0].x = "0.2500".to_owned();
        input.axes[0].y = "-1.0000".to_owned();
        input.axes[4].y = "0.5000".to_owned();

        let fields = input.axis_fields();
        assert_eq!(fields.len(), 2 * CONTROLLER_AXIS_COUNT);
        assert_eq!(fields[0], ("Axis0 X".to_owned(), "0.2500"));
        assert_eq!(fields[1], ("Axis0 Y".to_owned(), "-1.0000"));
        assert_eq!(fields[2], ("Axis1 X".to_owned(), ""));
        assert_eq!(fields[9], ("Axis4 Y".to_owned(), "0.5000"));
    }
}
