// Named nodes of the skate scene and their initial layout

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::graph::{NodeId, SceneGraph, Transform};
use crate::locomotion::Pose;

/// Layout of the rider relative to the board
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    /// Rider height in meters; the head container sits at the top
    pub user_height: f32,
    /// Rider yaw on the deck (riders stand sideways)
    pub rider_yaw: f32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            user_height: 1.7,
            rider_yaw: FRAC_PI_2,
        }
    }
}

/// Node handles owned by the scene; the locomotion core only borrows these ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneContent {
    /// Origin re-aligned to the board on calibration; parent of the ground
    pub world_center: NodeId,
    pub ground: NodeId,
    /// Follows the live board controller pose
    pub board_anchor: NodeId,
    pub board_surface: NodeId,
    pub human: NodeId,
    pub human_body: NodeId,
    pub head_container: NodeId,
    pub sky_box: NodeId,
    pub light: NodeId,
}

impl SceneContent {
    /// Create the skate scene nodes
    ///
    /// The board surface starts parked below the ground until calibration
    /// moves it onto the board controller.
    pub fn build(graph: &mut SceneGraph, config: &ContentConfig) -> Self {
        let world_center = graph.add_node("initial-board-axis", Transform::default());
        let ground = graph.add_node(
            "ground",
            Transform {
                parent: Some(world_center),
                ..Transform::default()
            },
        );
        let board_anchor = graph.add_node("board-controller", Transform::default());

        let below = Pose::BELOW_GROUND;
        let board_surface = graph.add_node(
            "board-surface",
            Transform {
                position: below.position,
                rotation: below.orientation,
                parent: None,
            },
        );
        let human = graph.add_node(
            "human",
            Transform {
                rotation: Quat::from_rotation_y(config.rider_yaw),
                parent: Some(board_surface),
                ..Transform::default()
            },
        );
        let human_body = graph.add_node(
            "human-body",
            Transform {
                position: Vec3::new(0.0, config.user_height / 2.0, 0.0),
                parent: Some(human),
                ..Transform::default()
            },
        );
        let head_container = graph.add_node(
            "head-container",
            Transform {
                position: Vec3::new(0.0, config.user_height, 0.0),
                parent: Some(human),
                ..Transform::default()
            },
        );
        let sky_box = graph.add_node("sky-box", Transform::default());
        let light = graph.add_node("light", Transform::at(Vec3::Y));

        info!("Scene content ready ({} nodes)", graph.len());

        Self {
            world_center,
            ground,
            board_anchor,
            board_surface,
            human,
            human_body,
            head_container,
            sky_box,
            light,
        }
    }
}
