// Message types exchanged with the VR host and renderer

use serde::{Deserialize, Serialize};

use crate::locomotion::{ControllerId, Direction, Hand, InputEvent, Pose, Stage};

// Tracking updates from the VR subsystem -> runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackingEvent {
    /// A motion controller became available
    ControllerConnected { id: ControllerId, hand: Hand },
    /// Fresh pose for a registered controller
    ControllerPose { id: ControllerId, pose: Pose },
    /// Fresh head-mounted display pose
    HeadPose { pose: Pose },
}

// Everything published on the input topic. Both halves carry a `type` tag, so
// the JSON stays flat: {"type": "key_down", "key": "space"}
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SessionEvent {
    Tracking(TrackingEvent),
    Input(InputEvent),
}

impl From<TrackingEvent> for SessionEvent {
    fn from(event: TrackingEvent) -> Self {
        SessionEvent::Tracking(event)
    }
}

impl From<InputEvent> for SessionEvent {
    fn from(event: InputEvent) -> Self {
        SessionEvent::Input(event)
    }
}

// World transform of a scene node, runtime -> renderer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NodeTransform {
    pub position: [f32; 3],
    pub orientation: [f32; 4],
}

impl From<Pose> for NodeTransform {
    fn from(pose: Pose) -> Self {
        Self {
            position: pose.position.to_array(),
            orientation: pose.orientation.to_array(),
        }
    }
}

/// Session status published by the runtime every tick
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SessionStatus {
    pub stage: Stage,
    pub speed: f32,
    pub direction: Direction,
    pub power: f32,
    pub calibrated: bool,
    /// Board controller pose relative to the calibration reference
    pub board_pose: NodeTransform,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locomotion::Key;
    use glam::{Quat, Vec3};

    #[test]
    fn test_parse_tracking_events() {
        let event: SessionEvent =
            serde_json::from_str(r#"{"type":"controller_connected","id":3,"hand":"right"}"#)
                .unwrap();
        assert_eq!(
            event,
            SessionEvent::Tracking(TrackingEvent::ControllerConnected {
                id: 3,
                hand: Hand::Right
            })
        );

        let event: SessionEvent = serde_json::from_str(
            r#"{"type":"head_pose","pose":{"position":[0.0,1.7,0.0],"orientation":[0.0,0.0,0.0,1.0]}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            SessionEvent::Tracking(TrackingEvent::HeadPose {
                pose: Pose::new(Vec3::new(0.0, 1.7, 0.0), Quat::IDENTITY)
            })
        );
    }

    #[test]
    fn test_parse_input_events() {
        let event: SessionEvent =
            serde_json::from_str(r#"{"type":"trigger_changed","value":0.5}"#).unwrap();
        assert_eq!(
            event,
            SessionEvent::Input(InputEvent::TriggerChanged { value: 0.5 })
        );

        let json = serde_json::to_string(&SessionEvent::from(InputEvent::KeyDown {
            key: Key::Space,
        }))
        .unwrap();
        assert_eq!(json, r#"{"type":"key_down","key":"space"}"#);
    }

    #[test]
    fn test_unknown_event_rejected() {
        assert!(serde_json::from_str::<SessionEvent>(r#"{"type":"teleport"}"#).is_err());
    }

    #[test]
    fn test_status_json() {
        let status = SessionStatus {
            stage: Stage::VrReady,
            speed: 0.0,
            direction: Direction::Backward,
            power: 0.0,
            calibrated: true,
            board_pose: Pose::BELOW_GROUND.into(),
        };
        let value = serde_json::to_value(status).unwrap();
        assert_eq!(value["stage"]["stage"], "vr_ready");
        assert_eq!(value["direction"], "backward");
        assert_eq!(value["board_pose"]["position"][1], -10.0);
    }
}
