// Rigid-body placement of a tracked device or scene node

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Physical hand a controller reports itself as
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Left,
    #[default]
    Right,
}

/// Position + orientation in world space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    /// Where the board sits until it has been calibrated: out of sight under the ground
    pub const BELOW_GROUND: Pose = Pose {
        position: Vec3::new(0.0, -10.0, 0.0),
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: orientation.normalize(),
        }
    }

    /// Rotation about the vertical axis in radians (Y of a YXZ decomposition)
    pub fn yaw(&self) -> f32 {
        let (yaw, _pitch, _roll) = self.orientation.to_euler(EulerRot::YXZ);
        yaw
    }

    /// Orientation with pitch and roll discarded
    pub fn yaw_only(&self) -> Quat {
        Quat::from_rotation_y(self.yaw())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_yaw_ignores_pitch() {
        let orientation = Quat::from_euler(EulerRot::YXZ, FRAC_PI_4, 0.3, 0.0);
        let pose = Pose::new(Vec3::ZERO, orientation);
        assert!((pose.yaw() - FRAC_PI_4).abs() < 1e-5, "yaw = {}", pose.yaw());
    }

    #[test]
    fn test_yaw_only_drops_tilt() {
        let orientation = Quat::from_euler(EulerRot::YXZ, 1.0, -0.2, 0.1);
        let flat = Pose::new(Vec3::ZERO, orientation).yaw_only();
        let forward = flat * Vec3::Z;
        assert!(forward.y.abs() < 1e-5, "yaw-only forward should stay level");
    }
}
