// Board calibration
//
// Captures the board controller pose at a button press and re-aligns the scene
// to it: the world origin takes the board's yaw with the ground dropped to deck
// height, and the board surface is mounted on the controller at a fixed offset.
// Every call recomputes the layout from the new reference, so repeated
// calibration never accumulates offsets.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::pose::Pose;
use crate::scene::{SceneAccess, SceneContent};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Controller height above the ground when standing on the board (m)
    pub board_height: f32,
    /// Deck tilt about the controller's local X axis (rad)
    pub board_tilt: f32,
    /// Deck offset along the controller's local forward axis (m)
    pub forward_offset: f32,
    /// Deck offset along the controller's local vertical axis (m)
    pub vertical_offset: f32,
    /// Added to the live controller position when reporting the board pose
    pub controller_offset: Vec3,
    pub board_offset: Vec3,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            board_height: 0.12,
            board_tilt: -0.17,
            forward_offset: 0.4,
            vertical_offset: -0.04,
            controller_offset: Vec3::ZERO,
            board_offset: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No board controller registered, or no pose reported for it yet
    BoardUnavailable,
    /// Scene content has not finished loading
    ContentNotReady,
    /// A content node handle did not resolve in the scene
    MissingNode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationOutcome {
    Applied(Pose),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Default)]
pub struct CalibrationEngine {
    config: CalibrationConfig,
    reference: Option<Pose>,
}

impl CalibrationEngine {
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            reference: None,
        }
    }

    /// Latest calibration reference, `None` before the first calibration
    pub fn reference(&self) -> Option<&Pose> {
        self.reference.as_ref()
    }

    pub fn is_calibrated(&self) -> bool {
        self.reference.is_some()
    }

    /// Calibrate against the board controller's current pose
    ///
    /// Skips without touching the scene when the board pose or the content is
    /// unavailable.
    pub fn calibrate<S: SceneAccess>(
        &mut self,
        board_pose: Option<Pose>,
        content: Option<&SceneContent>,
        scene: &mut S,
    ) -> CalibrationOutcome {
        let Some(reference) = board_pose else {
            warn!("Calibration skipped: board controller not available");
            return CalibrationOutcome::Skipped(SkipReason::BoardUnavailable);
        };
        let Some(content) = content else {
            warn!("Calibration skipped: scene content not ready");
            return CalibrationOutcome::Skipped(SkipReason::ContentNotReady);
        };

        let nodes = [content.world_center, content.board_anchor, content.board_surface];
        if nodes.iter().any(|&node| scene.transform(node).is_none()) {
            warn!("Calibration skipped: content node missing from scene");
            return CalibrationOutcome::Skipped(SkipReason::MissingNode);
        }
        if !scene.set_parent(content.board_surface, Some(content.board_anchor)) {
            warn!("Calibration skipped: board surface cannot be mounted");
            return CalibrationOutcome::Skipped(SkipReason::MissingNode);
        }

        if let Some(center) = scene.transform_mut(content.world_center) {
            center.position = Vec3::new(
                reference.position.x,
                reference.position.y - self.config.board_height,
                reference.position.z,
            );
            center.rotation = reference.yaw_only();
        }
        if let Some(anchor) = scene.transform_mut(content.board_anchor) {
            anchor.position = reference.position;
            anchor.rotation = reference.orientation;
        }
        if let Some(surface) = scene.transform_mut(content.board_surface) {
            surface.position = Vec3::ZERO;
            surface.rotation = Quat::from_rotation_x(self.config.board_tilt);
            surface.translate_local(Vec3::Z, self.config.forward_offset);
            surface.translate_local(Vec3::Y, self.config.vertical_offset);
        }

        info!(
            "Calibrated at position {:?}, yaw {:.3} rad",
            reference.position,
            reference.yaw()
        );
        self.reference = Some(reference);
        CalibrationOutcome::Applied(reference)
    }

    /// Board pose relative to the calibration reference
    ///
    /// Falls back to `Pose::BELOW_GROUND` until calibrated, or while the
    /// board controller pose is unknown.
    pub fn board_pose(&self, live: Option<Pose>) -> Pose {
        match (self.reference, live) {
            (Some(reference), Some(live)) => Pose::new(
                live.position + self.config.controller_offset + self.config.board_offset,
                live.orientation * reference.orientation.inverse(),
            ),
            _ => Pose::BELOW_GROUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ContentConfig, SceneGraph, Transform};

    fn scene() -> (SceneGraph, SceneContent) {
        let mut graph = SceneGraph::new();
        let content = SceneContent::build(&mut graph, &ContentConfig::default());
        (graph, content)
    }

    fn board_reference() -> Pose {
        Pose::new(Vec3::new(0.3, 0.15, -0.6), Quat::from_rotation_y(0.8))
    }

    fn layout(graph: &SceneGraph, content: &SceneContent) -> Vec<Transform> {
        [content.world_center, content.ground, content.board_anchor, content.board_surface]
            .iter()
            .filter_map(|&node| graph.transform(node).copied())
            .collect()
    }

    #[test]
    fn test_skips_without_board() {
        let (mut graph, content) = scene();
        let before = layout(&graph, &content);
        let mut engine = CalibrationEngine::default();

        let outcome = engine.calibrate(None, Some(&content), &mut graph);
        assert_eq!(outcome, CalibrationOutcome::Skipped(SkipReason::BoardUnavailable));
        assert_eq!(layout(&graph, &content), before, "scene must be untouched");
        assert!(!engine.is_calibrated());
    }

    #[test]
    fn test_skips_without_content() {
        let (mut graph, _content) = scene();
        let mut engine = CalibrationEngine::default();
        let outcome = engine.calibrate(Some(board_reference()), None, &mut graph);
        assert_eq!(outcome, CalibrationOutcome::Skipped(SkipReason::ContentNotReady));
        assert_eq!(engine.reference(), None);
    }

    #[test]
    fn test_aligns_world_center_and_mounts_board() {
        let (mut graph, content) = scene();
        let config = CalibrationConfig::default();
        let mut engine = CalibrationEngine::new(config);
        let reference = board_reference();

        let outcome = engine.calibrate(Some(reference), Some(&content), &mut graph);
        assert_eq!(outcome, CalibrationOutcome::Applied(reference));
        assert_eq!(engine.reference(), Some(&reference));

        let center = graph.transform(content.world_center).unwrap();
        assert!((center.position.y - (0.15 - config.board_height)).abs() < 1e-6);
        assert!((Pose::new(Vec3::ZERO, center.rotation).yaw() - 0.8).abs() < 1e-5);

        let surface = graph.transform(content.board_surface).unwrap();
        assert_eq!(surface.parent, Some(content.board_anchor));

        // Deck sits forward of the controller along its facing
        let deck = graph.world_pose(content.board_surface).unwrap();
        let forward = reference.orientation * Vec3::Z;
        let along = (deck.position - reference.position).dot(forward);
        assert!(along > 0.3 && along < 0.45, "deck forward offset {}", along);
    }

    #[test]
    fn test_repeated_calibration_does_not_drift() {
        let (mut graph, content) = scene();
        let mut engine = CalibrationEngine::default();

        engine.calibrate(Some(board_reference()), Some(&content), &mut graph);
        let first = layout(&graph, &content);
        let first_reference = engine.reference().copied();

        engine.calibrate(Some(board_reference()), Some(&content), &mut graph);
        assert_eq!(layout(&graph, &content), first);
        assert_eq!(engine.reference().copied(), first_reference);
    }

    #[test]
    fn test_recalibration_replaces_reference() {
        let (mut graph, content) = scene();
        let mut engine = CalibrationEngine::default();
        engine.calibrate(Some(board_reference()), Some(&content), &mut graph);

        let moved = Pose::new(Vec3::new(-1.0, 0.2, 2.0), Quat::from_rotation_y(-0.4));
        engine.calibrate(Some(moved), Some(&content), &mut graph);
        assert_eq!(engine.reference(), Some(&moved));

        let center = graph.transform(content.world_center).unwrap();
        assert!((center.position.x + 1.0).abs() < 1e-6);
        assert!((center.position.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_board_pose_fallback_and_relative() {
        let mut engine = CalibrationEngine::default();
        let live = board_reference();
        assert_eq!(engine.board_pose(Some(live)), Pose::BELOW_GROUND);

        let (mut graph, content) = scene();
        engine.calibrate(Some(live), Some(&content), &mut graph);
        assert_eq!(engine.board_pose(None), Pose::BELOW_GROUND);

        // At the reference pose the relative orientation is identity
        let relative = engine.board_pose(Some(live));
        let facing = relative.orientation * Vec3::Z;
        assert!((facing - Vec3::Z).length() < 1e-4, "relative facing {:?}", facing);
        assert_eq!(relative.position, live.position);
    }
}
