use crate::geometry::{Geometry, WireframeGeometry};
use cubestudy_common::{Color, NodeId, Transform};
use glam::Vec3;
use std::sync::Arc;

/// Shaded surface material (Blinn-Phong).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongMaterial {
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
}

impl PhongMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            specular: Color(0x111111),
            shininess: 30.0,
        }
    }
}

/// Unlit line material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineBasicMaterial {
    pub color: Color,
}

/// Directional light shining from the node's position toward `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub target: Vec3,
}

impl DirectionalLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            target: Vec3::ZERO,
        }
    }
}

/// Triangle mesh. The geometry may be shared with other nodes.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Arc<Geometry>,
    pub material: PhongMaterial,
}

/// Line-list drawable.
#[derive(Debug, Clone)]
pub struct LineSegments {
    pub geometry: Arc<WireframeGeometry>,
    pub material: LineBasicMaterial,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Group,
    DirectionalLight(DirectionalLight),
    Mesh(Mesh),
    LineSegments(LineSegments),
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Group => "Group",
            NodeKind::DirectionalLight(_) => "DirectionalLight",
            NodeKind::Mesh(_) => "Mesh",
            NodeKind::LineSegments(_) => "LineSegments",
        }
    }
}

/// A scene graph node. Children are owned by the graph, not by the node.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: String::new(),
            transform: Transform::default(),
            visible: true,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn directional_light(light: DirectionalLight) -> Self {
        Self::new(NodeKind::DirectionalLight(light))
    }

    pub fn mesh(geometry: Arc<Geometry>, material: PhongMaterial) -> Self {
        Self::new(NodeKind::Mesh(Mesh { geometry, material }))
    }

    pub fn line_segments(geometry: Arc<WireframeGeometry>, material: LineBasicMaterial) -> Self {
        Self::new(NodeKind::LineSegments(LineSegments { geometry, material }))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
