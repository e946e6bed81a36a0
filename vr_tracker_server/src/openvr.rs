use openvr::{ApplicationType, Context, System, TrackedControllerRole, TrackingUniverseOrigin};
use vr_tracker_common::device::{ControllerRole, DeviceClass, DeviceSlot, TrackingUniverse};
use vr_tracker_common::events::{ControllerAxis, ControllerInput, DevicePose};
use vr_tracker_common::pose::transform_from_rows;

use crate::runtime::{RuntimeError, VrRuntime};

/// SteamVR session opened as a background application, so it never starts
/// the compositor or competes with a running scene app.
pub struct OpenVrRuntime {
    context: Option<Context>,
    system: System,
}

// SAFETY: the session is created on the startup thread and afterwards only
// driven from the single poll thread that owns it; OpenVR's IVRSystem calls are
// not tied to the initializing thread.
unsafe impl Send for OpenVrRuntime {}

impl OpenVrRuntime {
    pub fn init() -> Result<Self, RuntimeError> {
        let context = unsafe { openvr::init(ApplicationType::Background) }
            .map_err(|e| RuntimeError::Init(format!("{:?}", e)))?;
        let system = context
            .system()
            .map_err(|e| RuntimeError::Init(format!("IVRSystem unavailable: {:?}", e)))?;
        Ok(Self {
            context: Some(context),
            system,
        })
    }
}

fn origin(universe: TrackingUniverse) -> TrackingUniverseOrigin {
    match universe {
        TrackingUniverse::Seated => TrackingUniverseOrigin::Seated,
        TrackingUniverse::Standing => TrackingUniverseOrigin::Standing,
    }
}

fn raw_pose(pose: &openvr::TrackedDevicePose) -> &openvr_sys::TrackedDevicePose_t {
    // SAFETY: `TrackedDevicePose` is a `#[repr(C)]` newtype over the sys struct.
    unsafe { &*(pose as *const openvr::TrackedDevicePose as *const openvr_sys::TrackedDevicePose_t) }
}

/// Reads the tracking code straight from the sys struct. The wrapper's
/// `tracking_result()` panics on codes outside the five it names, such as
/// `Fallback_RotationOnly` (300).
fn device_pose(pose: &openvr::TrackedDevicePose) -> DevicePose {
    let raw = raw_pose(pose);
    DevicePose {
        device_to_absolute: transform_from_rows(raw.mDeviceToAbsoluteTracking.m),
        tracking_result: raw.eTrackingResult as i32,
        pose_is_valid: raw.bPoseIsValid,
        device_is_connected: raw.bDeviceIsConnected,
    }
}

impl VrRuntime for OpenVrRuntime {
    fn device_poses(&mut self, universe: TrackingUniverse) -> Vec<DevicePose> {
        self.system
            .device_to_absolute_tracking_pose(origin(universe), 0.0)
            .iter()
            .map(device_pose)
            .collect()
    }

    fn is_device_connected(&self, slot: DeviceSlot) -> bool {
        self.system.is_tracked_device_connected(slot)
    }

    fn device_class(&self, slot: DeviceSlot) -> DeviceClass {
        DeviceClass::from_raw(self.system.tracked_device_class(slot) as i32)
    }

    fn controller_role(&self, slot: DeviceSlot) -> ControllerRole {
        match self.system.get_controller_role_for_tracked_device_index(slot) {
            Some(TrackedControllerRole::LeftHand) => ControllerRole::LeftHand,
            Some(TrackedControllerRole::RightHand) => ControllerRole::RightHand,
            None => ControllerRole::Invalid,
        }
    }

    fn controller_state_with_pose(
        &mut self,
        universe: TrackingUniverse,
        slot: DeviceSlot,
    ) -> Option<(ControllerInput, DevicePose)> {
        let (state, pose) = self
            .system
            .controller_state_with_pose(origin(universe), slot)?;
        let input = ControllerInput {
            packet_num: state.packet_num,
            button_pressed: state.button_pressed,
            button_touched: state.button_touched,
            axes: state.axis.map(|a| ControllerAxis { x: a.x, y: a.y }),
        };
        Some((input, device_pose(&pose)))
    }

    fn shutdown(&mut self) {
        if let Some(context) = self.context.take() {
            tracing::info!("Shutting down OpenVR");
            unsafe { context.shutdown() };
        }
    }
}

impl Drop for OpenVrRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use vr_tracker_common::device::tracking_status_label;

    use super::*;

    fn sys_pose(tracking_result: i32) -> openvr::TrackedDevicePose {
        let mut raw: openvr_sys::TrackedDevicePose_t = unsafe { std::mem::zeroed() };
        raw.mDeviceToAbsoluteTracking.m = [
            [1.0, 0.0, 0.0, 0.25],
            [0.0, 1.0, 0.0, 1.5],
            [0.0, 0.0, 1.0, -0.75],
        ];
        raw.eTrackingResult = tracking_result as _;
        raw.bPoseIsValid = true;
        raw.bDeviceIsConnected = true;
        openvr::TrackedDevicePose::from(raw)
    }

    #[test]
    fn test_fallback_rotation_only_maps_to_blank_label() {
        let pose = device_pose(&sys_pose(300));
        assert_eq!(pose.tracking_result, 300);
        assert_eq!(tracking_status_label(pose.tracking_result), "");
        assert!(pose.pose_is_valid);
        assert!(pose.device_is_connected);
    }

    #[test]
    fn test_known_code_and_matrix_are_carried_over() {
        let pose = device_pose(&sys_pose(200));
        assert_eq!(tracking_status_label(pose.tracking_result), "Running_OK");
        assert_eq!(pose.device_to_absolute[(0, 3)], 0.25);
        assert_eq!(pose.device_to_absolute[(1, 3)], 1.5);
        assert_eq!(pose.device_to_absolute[(2, 3)], -0.75);
    }
}
