// Speed integrator for board travel
// Maps (current speed, direction, power, elapsed time) to the next speed with an
// acceleration ramp, power-proportional slowdown and a hard speed limit.

use serde::{Deserialize, Serialize};

/// Travel direction along the board's forward axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Acceleration and speed limits
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeedProfile {
    /// Speed limit in scene units per frame
    pub max_speed: f32,
    /// Seconds to reach `max_speed` at full power
    pub acceleration_time: f32,
    /// Slowdown step as a fraction of the acceleration step
    pub slowdown_ratio: f32,
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self {
            max_speed: 0.05,
            acceleration_time: 4.0,
            slowdown_ratio: 0.5,
        }
    }
}

impl SpeedProfile {
    /// Speed gained per millisecond at full power
    pub fn acceleration_step(&self) -> f32 {
        self.max_speed / self.acceleration_time / 1000.0
    }

    /// Speed lost per millisecond with no power applied
    pub fn slowdown_step(&self) -> f32 {
        self.acceleration_step() * self.slowdown_ratio
    }
}

/// Compute the next speed
///
/// Slowdown is applied first, against the sign of the current speed, and never
/// takes more than the current magnitude, so slowing down alone cannot reverse
/// travel. Acceleration is applied afterwards and the result is clamped to
/// `[-max_speed, max_speed]`.
///
/// Expects sanitized input: `power` in [0, 1], `elapsed_ms` >= 0.
pub fn next_speed(
    profile: &SpeedProfile,
    current: f32,
    direction: Direction,
    power: f32,
    elapsed_ms: f32,
) -> f32 {
    let slowdown = ((1.0 - power) * profile.slowdown_step() * elapsed_ms).min(current.abs());
    let slowed = current - slowdown * current.signum();

    let speed = slowed + profile.acceleration_step() * power * direction.sign() * elapsed_ms;
    speed.clamp(-profile.max_speed, profile.max_speed)
}

/// Clamp raw trigger/keyboard power into [0, 1]
pub fn sanitize_power(power: f32) -> f32 {
    if power.is_finite() {
        power.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Negative or non-finite frame times count as no time passing
pub fn sanitize_elapsed(elapsed_ms: f32) -> f32 {
    if elapsed_ms.is_finite() {
        elapsed_ms.max(0.0)
    } else {
        0.0
    }
}
