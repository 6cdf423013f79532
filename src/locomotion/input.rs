// Input events and the power snapshot read by the frame loop
//
// Event callbacks write here synchronously; the frame tick reads whatever value
// was current when it ran (last write wins, no queue).

use serde::{Deserialize, Serialize};

use super::speed::sanitize_power;

/// Keys the runtime cares about
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Space,
    #[serde(other)]
    Other,
}

/// Keyboard fallback for the trigger
pub const POWER_KEY: Key = Key::Space;

/// Discrete input events from the hand controller and keyboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Trigger pressure, normalized to [0, 1]
    TriggerChanged { value: f32 },
    /// Secondary button state change
    SecondaryButton { pressed: bool },
    KeyDown { key: Key },
    KeyUp { key: Key },
}

/// What the caller has to do after an event was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    None,
    CalibrateRequested,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    trigger_power: f32,
    keyboard_power: f32,
    secondary_pressed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event. Calibration is requested once per press of the
    /// secondary button, on the released -> pressed edge.
    pub fn apply(&mut self, event: &InputEvent) -> InputEffect {
        match *event {
            InputEvent::TriggerChanged { value } => {
                self.trigger_power = sanitize_power(value);
            }
            InputEvent::SecondaryButton { pressed } => {
                let was_pressed = self.secondary_pressed;
                self.secondary_pressed = pressed;
                if pressed && !was_pressed {
                    return InputEffect::CalibrateRequested;
                }
            }
            InputEvent::KeyDown { key } if key == POWER_KEY => {
                self.keyboard_power = 1.0;
            }
            InputEvent::KeyUp { key } if key == POWER_KEY => {
                self.keyboard_power = 0.0;
            }
            InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. } => {}
        }
        InputEffect::None
    }

    /// Combined power: the stronger of trigger and keyboard
    pub fn power(&self) -> f32 {
        self.trigger_power.max(self.keyboard_power)
    }
}
