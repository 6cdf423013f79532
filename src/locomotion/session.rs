// Skating session: owns all locomotion state and runs the per-frame update
//
// Events and frame ticks are delivered from one thread of control, so any event
// handled before a tick is visible to that tick.

use glam::Vec3;
use tracing::{debug, info, warn};

use super::calibration::{CalibrationEngine, CalibrationOutcome};
use super::direction::direction_from_poses;
use super::input::{InputEffect, InputState};
use super::pose::Pose;
use super::registry::{ControllerRegistry, ControllerRole};
use super::speed::{Direction, next_speed, sanitize_elapsed, sanitize_power};
use super::stage::{Stage, StageError, StageEvent};
use crate::config::SkateConfig;
use crate::messages::{SessionEvent, SessionStatus, TrackingEvent};
use crate::scene::{SceneAccess, SceneContent};

/// Integrator memory carried from frame to frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionState {
    pub speed: f32,
    pub direction: Direction,
}

/// Result of one frame tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// False when the tick was skipped because the scene is not ready
    pub ready: bool,
    pub speed: f32,
    pub direction: Direction,
    pub power: f32,
}

impl FrameReport {
    fn not_ready(state: LocomotionState) -> Self {
        Self {
            ready: false,
            speed: state.speed,
            direction: state.direction,
            power: 0.0,
        }
    }
}

pub struct Session {
    config: SkateConfig,
    stage: Stage,
    registry: ControllerRegistry,
    calibration: CalibrationEngine,
    input: InputState,
    locomotion: LocomotionState,
    head: Option<Pose>,
    content: Option<SceneContent>,
}

impl Session {
    pub fn new(config: SkateConfig) -> Self {
        Self {
            registry: ControllerRegistry::new(config.board_hand),
            calibration: CalibrationEngine::new(config.calibration),
            stage: Stage::default(),
            input: InputState::new(),
            locomotion: LocomotionState::default(),
            head: None,
            content: None,
            config,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn locomotion(&self) -> LocomotionState {
        self.locomotion
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn registry_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.registry
    }

    pub fn calibration(&self) -> &CalibrationEngine {
        &self.calibration
    }

    pub fn content(&self) -> Option<&SceneContent> {
        self.content.as_ref()
    }

    /// Board pose relative to the calibration, or the below-ground fallback
    pub fn board_pose(&self) -> Pose {
        self.calibration.board_pose(self.registry.pose(ControllerRole::Board))
    }

    /// Status snapshot to publish after a tick
    pub fn status(&self, report: &FrameReport) -> SessionStatus {
        SessionStatus {
            stage: self.stage,
            speed: report.speed,
            direction: report.direction,
            power: report.power,
            calibrated: self.calibration.is_calibrated(),
            board_pose: self.board_pose().into(),
        }
    }

    pub fn begin_loading(&mut self) -> Result<(), StageError> {
        self.advance(StageEvent::BeginLoading)
    }

    /// Hand over the scene node handles once content loading has finished
    pub fn content_loaded(&mut self, content: SceneContent) -> Result<(), StageError> {
        self.advance(StageEvent::ContentLoaded)?;
        self.content = Some(content);
        Ok(())
    }

    /// Apply one tracking or input event
    pub fn handle<S: SceneAccess>(&mut self, event: SessionEvent, scene: &mut S) {
        match event {
            SessionEvent::Tracking(TrackingEvent::ControllerConnected { id, hand }) => {
                if self.registry.register(id, hand) {
                    if let Err(e) = self.advance(StageEvent::ControllersBound) {
                        warn!("{}", e);
                    }
                }
            }
            SessionEvent::Tracking(TrackingEvent::ControllerPose { id, pose }) => {
                self.registry.update_pose(id, pose);
            }
            SessionEvent::Tracking(TrackingEvent::HeadPose { pose }) => {
                self.head = Some(pose);
            }
            SessionEvent::Input(input) => {
                if self.input.apply(&input) == InputEffect::CalibrateRequested {
                    self.calibrate(scene);
                }
            }
        }
    }

    /// Calibrate against the board controller's current pose
    pub fn calibrate<S: SceneAccess>(&mut self, scene: &mut S) -> CalibrationOutcome {
        let board = self.registry.pose(ControllerRole::Board);
        let content = if self.stage.scene_ready() {
            self.content.as_ref()
        } else {
            None
        };
        self.calibration.calibrate(board, content, scene)
    }

    /// Advance locomotion by one frame
    ///
    /// 1. Power = max(trigger, keyboard)
    /// 2. Direction from board vs. head yaw
    /// 3. Integrate speed
    /// 4. Board anchor follows the live board controller
    /// 5. Slide the ground backwards along its forward axis by the speed
    pub fn tick<S: SceneAccess>(&mut self, scene: &mut S, elapsed_ms: f32) -> FrameReport {
        let content = match self.content {
            Some(content) if self.stage.scene_ready() => content,
            _ => return FrameReport::not_ready(self.locomotion),
        };

        let power = sanitize_power(self.input.power());
        let board = self.registry.pose(ControllerRole::Board);
        let direction = direction_from_poses(board.as_ref(), self.head.as_ref());
        let speed = next_speed(
            &self.config.speed,
            self.locomotion.speed,
            direction,
            power,
            sanitize_elapsed(elapsed_ms),
        );
        self.locomotion = LocomotionState { speed, direction };

        if let Some(pose) = board {
            if let Some(anchor) = scene.transform_mut(content.board_anchor) {
                anchor.position = pose.position;
                anchor.rotation = pose.orientation;
            }
        }
        // Moving the ground backwards carries the rider forwards
        if let Some(ground) = scene.transform_mut(content.ground) {
            ground.translate_local(Vec3::Z, -speed);
        }

        if power > 0.0 {
            debug!(
                "speed: direction={:?}, power={:.2}, elapsed={}ms, speed={:.5}",
                direction, power, elapsed_ms, speed
            );
        }

        FrameReport {
            ready: true,
            speed,
            direction,
            power,
        }
    }

    fn advance(&mut self, event: StageEvent) -> Result<(), StageError> {
        let next = self.stage.advance(event)?;
        if next != self.stage {
            info!("Session stage: {} -> {}", self.stage, next);
        }
        self.stage = next;
        Ok(())
    }
}
