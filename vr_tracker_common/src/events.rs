use crate::device::DeviceSlot;
use crate::pose::Transform;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: nalgebra::Vector3<f64>,
    pub orientation: nalgebra::Quaternion<f64>,
}

/// One slot's entry in the runtime's pose array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DevicePose {
    pub device_to_absolute: Transform,
    pub tracking_result: i32,
    pub pose_is_valid: bool,
    pub device_is_connected: bool,
}

impl Default for DevicePose {
    fn default() -> Self {
        Self {
            device_to_absolute: Transform::identity(),
            tracking_result: 1,
            pose_is_valid: false,
            device_is_connected: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControllerAxis {
    pub x: f32,
    pub y: f32,
}

pub const CONTROLLER_AXIS_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControllerInput {
    pub packet_num: u32,
    pub button_pressed: u64,
    pub button_touched: u64,
    pub axes: [ControllerAxis; CONTROLLER_AXIS_COUNT],
}

/// The four sets of text fields a device can be shown in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayGroup {
    Hmd,
    LeftController,
    RightController,
    GenericTracker,
}

impl DisplayGroup {
    pub const ALL: [DisplayGroup; 4] = [
        DisplayGroup::Hmd,
        DisplayGroup::LeftController,
        DisplayGroup::RightController,
        DisplayGroup::GenericTracker,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DisplayGroup::Hmd => "HMD",
            DisplayGroup::LeftController => "Left Controller",
            DisplayGroup::RightController => "Right Controller",
            DisplayGroup::GenericTracker => "Tracker",
        }
    }

    pub fn is_controller(self) -> bool {
        matches!(
            self,
            DisplayGroup::LeftController | DisplayGroup::RightController
        )
    }
}

/// What the poller emits for every connected, displayable device on every sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayUpdate {
    pub slot: DeviceSlot,
    pub group: DisplayGroup,
    pub pose: Pose,
    pub tracking_result: i32,
    /// Only set for controllers, and only when the runtime returned a state.
    pub input: Option<ControllerInput>,
}
