// Locomotion core for the VR skateboard
//
// Provides:
// - Speed integration (acceleration ramp, power-proportional slowdown)
// - Travel direction from head vs. board yaw
// - Controller role registry and board calibration
// - The per-frame session loop tying them together

mod calibration;
pub mod direction;
pub mod input;
pub mod pose;
mod registry;
mod session;
pub mod speed;
pub mod stage;

pub use calibration::{CalibrationConfig, CalibrationEngine, CalibrationOutcome, SkipReason};
pub use direction::{direction_from_poses, direction_from_yaws};
pub use input::{InputEffect, InputEvent, InputState, Key};
pub use pose::{Hand, Pose};
pub use registry::{
    BoundControllers, ControllerId, ControllerRegistry, ControllerRole, TrackedController,
};
pub use session::{FrameReport, LocomotionState, Session};
pub use speed::{Direction, SpeedProfile, next_speed};
pub use stage::{Stage, StageError, StageEvent};
