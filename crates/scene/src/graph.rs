use crate::node::{DirectionalLight, Node, NodeKind};
use cubestudy_common::NodeId;
use glam::{Mat4, Vec3};
use std::collections::BTreeMap;

/// Errors from scene graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("scene is sealed; nodes can no longer be added")]
    Sealed,
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
}

/// The scene graph owned by one lesson.
///
/// Nodes live in a BTreeMap keyed by sequential ids, so iteration follows
/// insertion order. Roots and child lists keep the draw order explicit.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: u32,
    sealed: bool,
}

/// A node reached by [`SceneGraph::traverse`], with its resolved world state.
#[derive(Debug, Clone, Copy)]
pub struct VisitedNode<'a> {
    pub id: NodeId,
    pub node: &'a Node,
    pub world: Mat4,
    pub depth: usize,
    /// False when the node or any ancestor is hidden.
    pub visible: bool,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of nodes, nested ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Freeze the node set. Later insertions fail with [`SceneError::Sealed`].
    pub fn seal(&mut self) {
        if !self.sealed {
            tracing::debug!(nodes = self.nodes.len(), "scene sealed");
        }
        self.sealed = true;
    }

    /// Add a top-level node.
    pub fn add(&mut self, node: Node) -> Result<NodeId, SceneError> {
        let id = self.insert(node, None)?;
        self.roots.push(id);
        Ok(id)
    }

    /// Add a node under an existing parent.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = self.insert(node, Some(parent))?;
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    fn insert(&mut self, mut node: Node, parent: Option<NodeId>) -> Result<NodeId, SceneError> {
        if self.sealed {
            return Err(SceneError::Sealed);
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        node.parent = parent;
        node.children.clear();
        self.nodes.insert(id, node);
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutable access to a node's attributes. Structure cannot change here.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Set a node's Euler rotation (radians).
    pub fn set_rotation(&mut self, id: NodeId, rotation: Vec3) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))?;
        node.transform.rotation = rotation;
        Ok(())
    }

    /// Depth-first, pre-order walk with world matrices resolved.
    pub fn traverse(&self) -> Vec<VisitedNode<'_>> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, Mat4, usize, bool)> = self
            .roots
            .iter()
            .rev()
            .map(|id| (*id, Mat4::IDENTITY, 0, true))
            .collect();

        while let Some((id, parent_world, depth, parent_visible)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let world = parent_world * node.transform.matrix();
            let visible = parent_visible && node.visible;
            out.push(VisitedNode {
                id,
                node,
                world,
                depth,
                visible,
            });
            for child in node.children.iter().rev() {
                stack.push((*child, world, depth + 1, visible));
            }
        }
        out
    }

    /// Visible directional lights with their world-space position.
    pub fn directional_lights(&self) -> Vec<(Vec3, DirectionalLight)> {
        self.traverse()
            .into_iter()
            .filter(|v| v.visible)
            .filter_map(|v| match &v.node.kind {
                NodeKind::DirectionalLight(light) => {
                    Some((v.world.transform_point3(Vec3::ZERO), *light))
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxGeometry;
    use crate::node::PhongMaterial;
    use cubestudy_common::Color;
    use std::sync::Arc;

    fn cube() -> Node {
        Node::mesh(
            Arc::new(BoxGeometry::new(1.0, 1.0, 1.0).build()),
            PhongMaterial::new(Color(0x044a88)),
        )
    }

    #[test]
    fn scene_starts_empty() {
        let s = SceneGraph::new();
        assert_eq!(s.node_count(), 0);
        assert!(s.roots().is_empty());
        assert!(!s.is_sealed());
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut s = SceneGraph::new();
        let a = s.add(Node::group()).unwrap();
        let b = s.add(cube()).unwrap();
        let c = s.add_child(a, cube()).unwrap();
        assert!(a < b && b < c);
        assert_eq!(s.roots(), &[a, b]);
        assert_eq!(s.get(a).unwrap().children(), &[c]);
        assert_eq!(s.get(c).unwrap().parent(), Some(a));
    }

    #[test]
    fn add_child_to_missing_parent() {
        let mut s = SceneGraph::new();
        let err = s.add_child(NodeId(7), cube()).unwrap_err();
        assert_eq!(err, SceneError::NodeNotFound(NodeId(7)));
        assert_eq!(s.node_count(), 0);
    }

    #[test]
    fn sealed_scene_rejects_insertion() {
        let mut s = SceneGraph::new();
        let g = s.add(Node::group()).unwrap();
        s.seal();
        assert_eq!(s.add(cube()), Err(SceneError::Sealed));
        assert_eq!(s.add_child(g, cube()), Err(SceneError::Sealed));
        assert_eq!(s.node_count(), 1);
    }

    #[test]
    fn sealed_scene_allows_attribute_mutation() {
        let mut s = SceneGraph::new();
        let id = s.add(cube()).unwrap();
        s.seal();
        s.set_rotation(id, Vec3::new(1.0, 1.0, 0.0)).unwrap();
        assert_eq!(s.get(id).unwrap().transform.rotation, Vec3::new(1.0, 1.0, 0.0));
        s.get_mut(id).unwrap().visible = false;
        assert!(!s.get(id).unwrap().visible);
    }

    #[test]
    fn set_rotation_on_missing_node() {
        let mut s = SceneGraph::new();
        assert_eq!(
            s.set_rotation(NodeId(0), Vec3::ONE),
            Err(SceneError::NodeNotFound(NodeId(0)))
        );
    }

    #[test]
    fn traverse_is_preorder_with_world_matrices() {
        let mut s = SceneGraph::new();
        let g = s
            .add(Node::group().with_position(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();
        let inner = s
            .add_child(g, cube().with_position(Vec3::new(0.0, 2.0, 0.0)))
            .unwrap();
        let sibling = s.add(cube()).unwrap();

        let visited = s.traverse();
        let order: Vec<NodeId> = visited.iter().map(|v| v.id).collect();
        assert_eq!(order, vec![g, inner, sibling]);
        assert_eq!(visited[1].depth, 1);
        let p = visited[1].world.transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn hidden_parent_hides_children() {
        let mut s = SceneGraph::new();
        let g = s.add(Node::group()).unwrap();
        s.add_child(g, cube()).unwrap();
        s.get_mut(g).unwrap().visible = false;
        assert!(s.traverse().iter().all(|v| !v.visible));
    }

    #[test]
    fn directional_lights_report_world_position() {
        let mut s = SceneGraph::new();
        s.add(
            Node::directional_light(DirectionalLight::new(Color::WHITE, 1.0))
                .with_position(Vec3::new(-1.0, 1.0, 4.0)),
        )
        .unwrap();
        s.add(cube()).unwrap();
        let lights = s.directional_lights();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].0, Vec3::new(-1.0, 1.0, 4.0));
        assert_eq!(lights[0].1.intensity, 1.0);
    }
}
