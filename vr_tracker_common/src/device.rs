use serde::{Deserialize, Serialize};

use crate::events::DisplayGroup;

/// Number of device slots the runtime reports on every pose query.
pub const MAX_TRACKED_DEVICE_COUNT: usize = 64;

pub type DeviceSlot = u32;

#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Invalid = 0,
    Hmd = 1,
    Controller = 2,
    GenericTracker = 3,
    TrackingReference = 4,
    DisplayRedirect = 5,
}

impl DeviceClass {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => DeviceClass::Hmd,
            2 => DeviceClass::Controller,
            3 => DeviceClass::GenericTracker,
            4 => DeviceClass::TrackingReference,
            5 => DeviceClass::DisplayRedirect,
            _ => DeviceClass::Invalid,
        }
    }
}

#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControllerRole {
    Invalid = 0,
    LeftHand = 1,
    RightHand = 2,
    OptOut = 3,
    Treadmill = 4,
    Stylus = 5,
}

impl ControllerRole {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => ControllerRole::LeftHand,
            2 => ControllerRole::RightHand,
            3 => ControllerRole::OptOut,
            4 => ControllerRole::Treadmill,
            5 => ControllerRole::Stylus,
            _ => ControllerRole::Invalid,
        }
    }
}

/// Confidence of a device's current pose estimate, as reported by the runtime.
///
/// The runtime hands these over as raw integers; values outside the named set
/// (newer runtimes add e.g. `Fallback_RotationOnly = 300`) have no label.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackingResult {
    Uninitialized = 1,
    CalibratingInProgress = 100,
    CalibratingOutOfRange = 101,
    RunningOk = 200,
    RunningOutOfRange = 201,
}

impl TrackingResult {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(TrackingResult::Uninitialized),
            100 => Some(TrackingResult::CalibratingInProgress),
            101 => Some(TrackingResult::CalibratingOutOfRange),
            200 => Some(TrackingResult::RunningOk),
            201 => Some(TrackingResult::RunningOutOfRange),
            _ => None,
        }
    }

    pub fn raw(self) -> i32 {
        self as i32
    }

    /// The runtime's own name for the value.
    pub fn label(self) -> &'static str {
        match self {
            TrackingResult::Uninitialized => "Uninitialized",
            TrackingResult::CalibratingInProgress => "Calibrating_InProgress",
            TrackingResult::CalibratingOutOfRange => "Calibrating_OutOfRange",
            TrackingResult::RunningOk => "Running_OK",
            TrackingResult::RunningOutOfRange => "Running_OutOfRange",
        }
    }
}

/// Label shown in a group's `state` field. Unknown codes render as "".
pub fn tracking_status_label(raw: i32) -> &'static str {
    TrackingResult::from_raw(raw).map_or("", TrackingResult::label)
}

/// Reference frame the runtime expresses poses in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingUniverse {
    Seated,
    #[default]
    Standing,
}

/// Everything the runtime tells us about one slot, read-only to the poller.
///
/// `role` is only meaningful for controllers and is `Invalid` otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceRecord {
    pub slot: DeviceSlot,
    pub class: DeviceClass,
    pub role: ControllerRole,
    pub tracking_result: i32,
    pub connected: bool,
}

impl DeviceRecord {
    /// The group this device is shown in, or `None` when it is not displayed.
    pub fn display_group(&self) -> Option<DisplayGroup> {
        if !self.connected {
            return None;
        }
        match (self.class, self.role) {
            (DeviceClass::Hmd, _) => Some(DisplayGroup::Hmd),
            (DeviceClass::Controller, ControllerRole::LeftHand) => Some(DisplayGroup::LeftController),
            (DeviceClass::Controller, ControllerRole::RightHand) => {
                Some(DisplayGroup::RightController)
            }
            (DeviceClass::GenericTracker, _) => Some(DisplayGroup::GenericTracker),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_tracking_results_label_themselves() {
        assert_eq!(tracking_status_label(1), "Uninitialized");
        assert_eq!(tracking_status_label(100), "Calibrating_InProgress");
        assert_eq!(tracking_status_label(101), "Calibrating_OutOfRange");
        assert_eq!(tracking_status_label(200), "Running_OK");
        assert_eq!(tracking_status_label(201), "Running_OutOfRange");
    }

    #[test]
    fn test_unknown_tracking_results_are_blank() {
        for raw in [0, -1, 2, 99, 102, 202, 300, i32::MAX, i32::MIN] {
            assert_eq!(tracking_status_label(raw), "", "raw = {raw}");
        }
    }

    #[test]
    fn test_tracking_result_raw_values() {
        for result in [
            TrackingResult::Uninitialized,
            TrackingResult::CalibratingInProgress,
            TrackingResult::CalibratingOutOfRange,
            TrackingResult::RunningOk,
            TrackingResult::RunningOutOfRange,
        ] {
            assert_eq!(TrackingResult::from_raw(result.raw()), Some(result));
        }
    }

    #[test]
    fn test_unknown_class_and_role_collapse_to_invalid() {
        assert_eq!(DeviceClass::from_raw(2), DeviceClass::Controller);
        assert_eq!(DeviceClass::from_raw(42), DeviceClass::Invalid);
        assert_eq!(ControllerRole::from_raw(2), ControllerRole::RightHand);
        assert_eq!(ControllerRole::from_raw(-7), ControllerRole::Invalid);
    }

    fn record(class: DeviceClass, role: ControllerRole) -> DeviceRecord {
        DeviceRecord {
            slot: 4,
            class,
            role,
            tracking_result: 200,
            connected: true,
        }
    }

    #[test]
    fn test_display_group_by_class_and_role() {
        use ControllerRole::*;
        use DeviceClass::*;
        use ControllerRole::Invalid;

        assert_eq!(record(Hmd, Invalid).display_group(), Some(DisplayGroup::Hmd));
        assert_eq!(
            record(Controller, LeftHand).display_group(),
            Some(DisplayGroup::LeftController)
        );
        assert_eq!(
            record(Controller, RightHand).display_group(),
            Some(DisplayGroup::RightController)
        );
        assert_eq!(
            record(GenericTracker, Invalid).display_group(),
            Some(DisplayGroup::GenericTracker)
        );
        for role in [Invalid, OptOut, Treadmill, Stylus] {
            assert_eq!(record(Controller, role).display_group(), None, "{role:?}");
        }
        assert_eq!(record(TrackingReference, Invalid).display_group(), None);
        assert_eq!(record(DisplayRedirect, Invalid).display_group(), None);
    }

    #[test]
    fn test_disconnected_record_is_not_displayed() {
        let mut hmd = record(DeviceClass::Hmd, ControllerRole::Invalid);
        hmd.connected = false;
        assert_eq!(hmd.display_group(), None);
    }
}
