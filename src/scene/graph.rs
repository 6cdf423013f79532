// Arena of transform nodes with parent links

use glam::{Quat, Vec3};
use tracing::warn;

use crate::locomotion::Pose;

/// Handle to a node in a `SceneGraph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Local placement of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub parent: Option<NodeId>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            parent: None,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Move along one of the node's own axes
    pub fn translate_local(&mut self, axis: Vec3, distance: f32) {
        self.position += self.rotation * (axis * distance);
    }
}

/// What the locomotion core is allowed to do to scene nodes
pub trait SceneAccess {
    fn transform(&self, node: NodeId) -> Option<&Transform>;
    fn transform_mut(&mut self, node: NodeId) -> Option<&mut Transform>;

    /// Re-parent `node`, keeping its local transform. Returns false if either
    /// node is unknown or the link would form a cycle.
    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> bool;
}

#[derive(Debug, Clone)]
struct SceneNode {
    name: String,
    transform: Transform,
}

#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. A parent that is not already in the graph is dropped.
    pub fn add_node(&mut self, name: impl Into<String>, mut transform: Transform) -> NodeId {
        let id = NodeId(self.nodes.len());
        if transform.parent.is_some_and(|parent| parent.0 >= id.0) {
            warn!("Node {:?} added with unknown parent, attaching to root", id);
            transform.parent = None;
        }
        self.nodes.push(SceneNode {
            name: name.into(),
            transform,
        });
        id
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|n| n.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Compose the parent chain into a world-space pose
    pub fn world_pose(&self, node: NodeId) -> Option<Pose> {
        let mut current = self.transform(node)?;
        let mut position = current.position;
        let mut rotation = current.rotation;

        // Parent links are acyclic (enforced by set_parent), so this ends
        while let Some(parent) = current.parent {
            current = self.transform(parent)?;
            position = current.rotation * position + current.position;
            rotation = current.rotation * rotation;
        }
        Some(Pose::new(position, rotation))
    }

    fn is_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            cursor = self.transform(id).and_then(|t| t.parent);
        }
        false
    }
}

impl SceneAccess for SceneGraph {
    fn transform(&self, node: NodeId) -> Option<&Transform> {
        self.nodes.get(node.0).map(|n| &n.transform)
    }

    fn transform_mut(&mut self, node: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(node.0).map(|n| &mut n.transform)
    }

    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> bool {
        if node.0 >= self.nodes.len() {
            return false;
        }
        if let Some(parent) = parent {
            if parent.0 >= self.nodes.len() || self.is_ancestor(node, parent) {
                return false;
            }
        }
        self.nodes[node.0].transform.parent = parent;
        true
    }
}
