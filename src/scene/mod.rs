// In-process scene content provider
//
// The locomotion core never creates or destroys nodes; it only rewrites the
// transform and parent of nodes it was handed through `SceneAccess`.

mod content;
mod graph;

pub use content::{ContentConfig, SceneContent};
pub use graph::{NodeId, SceneAccess, SceneGraph, Transform};
