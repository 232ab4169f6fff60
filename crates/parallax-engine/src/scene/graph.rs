use crate::coords::Color;

use super::node::{Node, NodeId, Transform};

/// Minimal scene capability the loop and the lessons rely on.
pub trait SceneGraph {
    fn add(&mut self, node: Node) -> NodeId;

    /// Transform of `id`, or `None` if the id belongs to another scene.
    fn node_mut(&mut self, id: NodeId) -> Option<&mut Transform>;
}

/// Flat list of nodes drawn in insertion order.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
    pub background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            background: Color::BLACK,
        }
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Full node access, for material changes after a load completes.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visible nodes, in insertion order.
    pub fn visible(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.visible)
    }
}

impl SceneGraph for Scene {
    fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(id.index()).map(|n| &mut n.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Mesh;
    use glam::Vec3;

    #[test]
    fn ids_address_the_added_node() {
        let mut scene = Scene::new();
        let a = scene.add(Node::new(Mesh::UNIT_CUBE, Color::from_hex(0xff0000)));
        let b = scene.add(Node::new(Mesh::UNIT_CUBE, Color::from_hex(0x00ff00)));

        scene.node_mut(b).unwrap().position = Vec3::X;
        assert_eq!(scene.node(a).unwrap().transform.position, Vec3::ZERO);
        assert_eq!(scene.node(b).unwrap().transform.position, Vec3::X);
    }

    #[test]
    fn hidden_nodes_are_skipped() {
        let mut scene = Scene::new();
        let id = scene.add(Node::new(Mesh::UNIT_CUBE, Color::WHITE));
        scene.add(Node::new(Mesh::UNIT_CUBE, Color::WHITE));
        scene.get_mut(id).unwrap().visible = false;
        assert_eq!(scene.visible().count(), 1);
    }

    #[test]
    fn foreign_id_is_none() {
        let mut scene = Scene::new();
        assert!(scene.node_mut(NodeId(3)).is_none());
    }
}
