//! Scripted runtime used by the tests and by the demo mode of both front ends.

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::sync::Arc;

use nalgebra::{Rotation3, Vector3};
use parking_lot::Mutex;
use vr_tracker_common::device::{
    ControllerRole, DeviceClass, DeviceSlot, TrackingResult, TrackingUniverse,
    MAX_TRACKED_DEVICE_COUNT,
};
use vr_tracker_common::events::{ControllerAxis, ControllerInput, DevicePose};
use vr_tracker_common::pose::Transform;

use crate::runtime::VrRuntime;

/// Seconds of simulated time per pose query.
const TICK_SECONDS: f64 = 0.011;

/// Standing eye height of the demo headset, metres.
const EYE_HEIGHT: f64 = 1.65;

/// Calls observed by a [`MockRuntime`], shared so tests can inspect them after
/// the runtime has moved onto the poll thread.
#[derive(Debug, Default)]
pub struct CallLog {
    pub pose_queries: u64,
    pub last_universe: Option<TrackingUniverse>,
    /// Class, role and controller-state queries, per slot.
    pub slot_queries: HashMap<DeviceSlot, u64>,
    pub state_queries: u64,
    pub shutdowns: u64,
}

#[derive(Clone)]
pub struct MockDevice {
    class: DeviceClass,
    role: ControllerRole,
    connected: bool,
    tracking_result: i32,
    pose: Transform,
    trajectory: Option<fn(f64) -> Transform>,
    input: ControllerInput,
    input_script: Option<fn(f64) -> ControllerInput>,
    state_available: bool,
    state_pose: Option<Transform>,
}

impl MockDevice {
    pub fn new(class: DeviceClass) -> Self {
        Self {
            class,
            role: ControllerRole::Invalid,
            connected: true,
            tracking_result: TrackingResult::RunningOk.raw(),
            pose: Transform::identity(),
            trajectory: None,
            input: ControllerInput::default(),
            input_script: None,
            state_available: true,
            state_pose: None,
        }
    }

    pub fn controller(role: ControllerRole) -> Self {
        Self::new(DeviceClass::Controller).role(role)
    }

    pub fn role(mut self, role: ControllerRole) -> Self {
        self.role = role;
        self
    }

    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }

    pub fn tracking_result(mut self, raw: i32) -> Self {
        self.tracking_result = raw;
        self
    }

    pub fn pose(mut self, pose: Transform) -> Self {
        self.pose = pose;
        self
    }

    pub fn trajectory(mut self, trajectory: fn(f64) -> Transform) -> Self {
        self.trajectory = Some(trajectory);
        self
    }

    pub fn input(mut self, input: ControllerInput) -> Self {
        self.input = input;
        self
    }

    pub fn input_script(mut self, script: fn(f64) -> ControllerInput) -> Self {
        self.input_script = Some(script);
        self
    }

    /// Pose returned by the controller-state query instead of the array pose.
    pub fn state_pose(mut self, pose: Transform) -> Self {
        self.state_pose = Some(pose);
        self
    }

    /// Makes the controller-state query fail for this device.
    pub fn without_state(mut self) -> Self {
        self.state_available = false;
        self
    }

    fn transform_at(&self, t: f64) -> Transform {
        self.trajectory.map_or(self.pose, |f| f(t))
    }

    fn input_at(&self, t: f64) -> ControllerInput {
        self.input_script.map_or(self.input, |f| f(t))
    }
}

pub struct MockRuntime {
    slots: Vec<Option<MockDevice>>,
    tick: u64,
    calls: Arc<Mutex<CallLog>>,
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            slots: vec![None; MAX_TRACKED_DEVICE_COUNT],
            tick: 0,
            calls: Default::default(),
        }
    }

    /// Places `device` in `slot`. Slots past the device array are ignored.
    pub fn with_device(mut self, slot: DeviceSlot, device: MockDevice) -> Self {
        match self.slots.get_mut(slot as usize) {
            Some(entry) => *entry = Some(device),
            None => tracing::warn!("Mock slot {} is out of range, ignoring", slot),
        }
        self
    }

    /// A headset, both controllers, a base station and a hip tracker, all moving.
    pub fn demo_rig() -> Self {
        Self::new()
            .with_device(0, MockDevice::new(DeviceClass::Hmd).trajectory(demo_head))
            .with_device(
                1,
                MockDevice::new(DeviceClass::TrackingReference)
                    .pose(translation(Vector3::new(2.0, 2.2, -2.0))),
            )
            .with_device(
                2,
                MockDevice::controller(ControllerRole::LeftHand)
                    .trajectory(demo_left_hand)
                    .input_script(demo_left_input),
            )
            .with_device(
                3,
                MockDevice::controller(ControllerRole::RightHand)
                    .trajectory(demo_right_hand)
                    .input_script(demo_right_input),
            )
            .with_device(
                5,
                MockDevice::new(DeviceClass::GenericTracker).trajectory(demo_hip),
            )
    }

    pub fn call_log(&self) -> Arc<Mutex<CallLog>> {
        self.calls.clone()
    }

    fn device(&self, slot: DeviceSlot) -> Option<&MockDevice> {
        self.slots.get(slot as usize).and_then(Option::as_ref)
    }

    fn note_slot_query(&self, slot: DeviceSlot) {
        *self.calls.lock().slot_queries.entry(slot).or_default() += 1;
    }

    fn seconds(&self) -> f64 {
        self.tick as f64 * TICK_SECONDS
    }

    fn device_pose(&self, device: &MockDevice, transform: Transform) -> DevicePose {
        DevicePose {
            device_to_absolute: transform,
            tracking_result: device.tracking_result,
            pose_is_valid: device.connected,
            device_is_connected: device.connected,
        }
    }
}

impl VrRuntime for MockRuntime {
    fn device_poses(&mut self, universe: TrackingUniverse) -> Vec<DevicePose> {
        self.tick += 1;
        {
            let mut calls = self.calls.lock();
            calls.pose_queries += 1;
            calls.last_universe = Some(universe);
        }
        let t = self.seconds();
        self.slots
            .iter()
            .map(|slot| match slot {
                Some(device) => self.device_pose(device, device.transform_at(t)),
                None => DevicePose::default(),
            })
            .collect()
    }

    fn is_device_connected(&self, slot: DeviceSlot) -> bool {
        self.device(slot).is_some_and(|d| d.connected)
    }

    fn device_class(&self, slot: DeviceSlot) -> DeviceClass {
        self.note_slot_query(slot);
        self.device(slot).map_or(DeviceClass::Invalid, |d| d.class)
    }

    fn controller_role(&self, slot: DeviceSlot) -> ControllerRole {
        self.note_slot_query(slot);
        self.device(slot).map_or(ControllerRole::Invalid, |d| d.role)
    }

    fn controller_state_with_pose(
        &mut self,
        _universe: TrackingUniverse,
        slot: DeviceSlot,
    ) -> Option<(ControllerInput, DevicePose)> {
        self.note_slot_query(slot);
        self.calls.lock().state_queries += 1;

        let t = self.seconds();
        let device = self.device(slot)?;
        let has_state = matches!(
            device.class,
            DeviceClass::Controller | DeviceClass::GenericTracker
        );
        if !device.connected || !device.state_available || !has_state {
            return None;
        }
        let transform = device
            .state_pose
            .unwrap_or_else(|| device.transform_at(t));
        let mut input = device.input_at(t);
        input.packet_num = self.tick as u32;
        Some((input, self.device_pose(device, transform)))
    }

    fn shutdown(&mut self) {
        let mut calls = self.calls.lock();
        if calls.shutdowns == 0 {
            tracing::info!("Mock runtime shut down after {} pose queries", calls.pose_queries);
        }
        calls.shutdowns += 1;
    }
}

pub fn translation(offset: Vector3<f64>) -> Transform {
    rigid(Rotation3::identity(), offset)
}

pub fn rigid(rotation: Rotation3<f64>, offset: Vector3<f64>) -> Transform {
    let mut m = Transform::zeros();
    m.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation.matrix());
    m.set_column(3, &offset);
    m
}

fn demo_head(t: f64) -> Transform {
    let yaw = 0.6 * (TAU * t / 8.0).sin();
    let pitch = 0.15 * (TAU * t / 5.0).sin();
    rigid(
        Rotation3::from_euler_angles(pitch, yaw, 0.0),
        Vector3::new(0.2 * (TAU * t / 8.0).cos(), EYE_HEIGHT, 0.1 * (TAU * t / 6.0).sin()),
    )
}

fn demo_hand(t: f64, side: f64) -> Transform {
    let swing = (TAU * t / 3.0 + side).sin();
    rigid(
        Rotation3::from_euler_angles(-0.4 + 0.3 * swing, 0.2 * side, 0.5 * swing * side),
        Vector3::new(0.25 * side, 1.1 + 0.15 * swing, -0.3 + 0.1 * swing),
    )
}

fn demo_left_hand(t: f64) -> Transform {
    demo_hand(t, -1.0)
}

fn demo_right_hand(t: f64) -> Transform {
    demo_hand(t, 1.0)
}

fn demo_hip(t: f64) -> Transform {
    rigid(
        Rotation3::from_euler_angles(0.0, 0.3 * (TAU * t / 8.0).sin(), 0.0),
        Vector3::new(0.0, 1.0, 0.05 * (TAU * t / 4.0).sin()),
    )
}

fn demo_input(t: f64, phase: f64) -> ControllerInput {
    let wave = (TAU * t / 2.0 + phase).sin() as f32;
    let trigger = wave.max(0.0);
    let mut axes = [ControllerAxis::default(); 5];
    axes[0] = ControllerAxis {
        x: (TAU * t / 4.0 + phase).cos() as f32 * 0.8,
        y: (TAU * t / 4.0 + phase).sin() as f32 * 0.8,
    };
    axes[1] = ControllerAxis { x: trigger, y: 0.0 };
    // bit 33 is the trigger (k_EButton_Axis1), bit 32 the touchpad (Axis0)
    let touched = (1u64 << 32) | if trigger > 0.0 { 1 << 33 } else { 0 };
    let pressed = if trigger > 0.9 { 1u64 << 33 } else { 0 };
    ControllerInput {
        packet_num: 0,
        button_pressed: pressed,
        button_touched: touched,
        axes,
    }
}

fn demo_left_input(t: f64) -> ControllerInput {
    demo_input(t, 0.0)
}

fn demo_right_input(t: f64) -> ControllerInput {
    demo_input(t, std::f64::consts::PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_rig_layout() {
        let mut rig = MockRuntime::demo_rig();
        let poses = rig.device_poses(TrackingUniverse::Standing);
        assert_eq!(poses.len(), MAX_TRACKED_DEVICE_COUNT);
        assert!(poses[0].device_is_connected);
        assert!(!poses[4].device_is_connected);
        assert_eq!(rig.device_class(0), DeviceClass::Hmd);
        assert_eq!(rig.device_class(1), DeviceClass::TrackingReference);
        assert_eq!(rig.controller_role(2), ControllerRole::LeftHand);
        assert_eq!(rig.controller_role(3), ControllerRole::RightHand);
        assert_eq!(rig.device_class(5), DeviceClass::GenericTracker);
        assert!(!rig.is_device_connected(63));
        assert!(!rig.is_device_connected(64));
    }

    #[test]
    fn test_demo_poses_move_between_queries() {
        let mut rig = MockRuntime::demo_rig();
        let first = rig.device_poses(TrackingUniverse::Standing)[0];
        let second = rig.device_poses(TrackingUniverse::Standing)[0];
        assert_ne!(first.device_to_absolute, second.device_to_absolute);
    }

    #[test]
    fn test_state_query_only_for_input_devices() {
        let mut rig = MockRuntime::demo_rig();
        rig.device_poses(TrackingUniverse::Standing);
        assert!(rig
            .controller_state_with_pose(TrackingUniverse::Standing, 0)
            .is_none());
        let (input, pose) = rig
            .controller_state_with_pose(TrackingUniverse::Standing, 2)
            .unwrap();
        assert_eq!(input.packet_num, 1);
        assert!(pose.device_is_connected);
        assert!(rig
            .controller_state_with_pose(TrackingUniverse::Standing, 5)
            .is_some());
        assert_eq!(rig.call_log().lock().state_queries, 3);
    }

    #[test]
    fn test_shutdown_is_counted() {
        let mut rig = MockRuntime::new();
        let log = rig.call_log();
        rig.shutdown();
        rig.shutdown();
        assert_eq!(log.lock().shutdowns, 2);
    }
}
