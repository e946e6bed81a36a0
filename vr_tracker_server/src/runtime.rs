use thiserror::Error;
use vr_tracker_common::config::{PollConfig, RuntimeBackend};
use vr_tracker_common::device::{ControllerRole, DeviceClass, DeviceSlot, TrackingUniverse};
use vr_tracker_common::events::{ControllerInput, DevicePose};

use crate::mock::MockRuntime;
#[cfg(feature = "openvr")]
use crate::openvr::OpenVrRuntime;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("VR runtime failed to initialize: {0}")]
    Init(String),
    #[error("{0} backend is not compiled into this build")]
    BackendUnavailable(&'static str),
}

/// The slice of a VR runtime's API the poller consumes.
///
/// Implementations own whatever session state the runtime needs; it is
/// released by [`VrRuntime::shutdown`], which must tolerate being called twice.
pub trait VrRuntime: Send {
    /// Poses for every slot, `MAX_TRACKED_DEVICE_COUNT` entries long.
    fn device_poses(&mut self, universe: TrackingUniverse) -> Vec<DevicePose>;

    fn is_device_connected(&self, slot: DeviceSlot) -> bool;

    fn device_class(&self, slot: DeviceSlot) -> DeviceClass;

    fn controller_role(&self, slot: DeviceSlot) -> ControllerRole;

    fn controller_state_with_pose(
        &mut self,
        universe: TrackingUniverse,
        slot: DeviceSlot,
    ) -> Option<(ControllerInput, DevicePose)>;

    fn shutdown(&mut self);
}

/// A live runtime session for whichever backend the config selected.
pub enum Session {
    Mock(MockRuntime),
    #[cfg(feature = "openvr")]
    OpenVr(OpenVrRuntime),
}

impl Session {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Session::Mock(_) => "mock",
            #[cfg(feature = "openvr")]
            Session::OpenVr(_) => "openvr",
        }
    }

    fn inner(&self) -> &dyn VrRuntime {
        match self {
            Session::Mock(r) => r,
            #[cfg(feature = "openvr")]
            Session::OpenVr(r) => r,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn VrRuntime {
        match self {
            Session::Mock(r) => r,
            #[cfg(feature = "openvr")]
            Session::OpenVr(r) => r,
        }
    }
}

impl VrRuntime for Session {
    fn device_poses(&mut self, universe: TrackingUniverse) -> Vec<DevicePose> {
        self.inner_mut().device_poses(universe)
    }

    fn is_device_connected(&self, slot: DeviceSlot) -> bool {
        self.inner().is_device_connected(slot)
    }

    fn device_class(&self, slot: DeviceSlot) -> DeviceClass {
        self.inner().device_class(slot)
    }

    fn controller_role(&self, slot: DeviceSlot) -> ControllerRole {
        self.inner().controller_role(slot)
    }

    fn controller_state_with_pose(
        &mut self,
        universe: TrackingUniverse,
        slot: DeviceSlot,
    ) -> Option<(ControllerInput, DevicePose)> {
        self.inner_mut().controller_state_with_pose(universe, slot)
    }

    fn shutdown(&mut self) {
        self.inner_mut().shutdown()
    }
}

/// Opens the runtime named by `config.backend`. Failure here is fatal to the caller.
pub fn open_session(config: &PollConfig) -> Result<Session, RuntimeError> {
    let session = match config.backend {
        RuntimeBackend::Mock => Session::Mock(MockRuntime::demo_rig()),
        #[cfg(feature = "openvr")]
        RuntimeBackend::OpenVr => Session::OpenVr(OpenVrRuntime::init()?),
        #[cfg(not(feature = "openvr"))]
        RuntimeBackend::OpenVr => return Err(RuntimeError::BackendUnavailable("openvr")),
    };
    tracing::info!("Opened {} runtime session", session.backend_name());
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_mock_session() {
        let config = PollConfig {
            backend: RuntimeBackend::Mock,
            ..Default::default()
        };
        let mut session = open_session(&config).unwrap();
        assert_eq!(session.backend_name(), "mock");
        assert!(session.is_device_connected(0));
        assert_eq!(session.device_class(0), DeviceClass::Hmd);
        session.shutdown();
    }

    #[cfg(not(feature = "openvr"))]
    #[test]
    fn test_openvr_without_feature_is_an_error() {
        let config = PollConfig {
            backend: RuntimeBackend::OpenVr,
            ..Default::default()
        };
        let err = open_session(&config).err().unwrap();
        assert!(matches!(err, RuntimeError::BackendUnavailable("openvr")));
    }
}
