//! Scene types.
//!
//! The core only needs `SceneGraph`: a place to add nodes and reach their
//! transforms. `Scene` is the flat implementation the wgpu renderer draws.

mod graph;
mod node;

pub use graph::{Scene, SceneGraph};
pub use node::{Mesh, Node, NodeId, Transform};
