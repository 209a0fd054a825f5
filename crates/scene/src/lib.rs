//! Scene graph: an ordered tree of lights, meshes, line sets and groups.
//!
//! # Invariants
//! - Node ids are assigned in insertion order and never reused.
//! - Once sealed, the set of nodes is fixed; only node attributes change.
//! - World matrices are always parent * child.

pub mod geometry;
pub mod graph;
pub mod node;

pub use geometry::{BoxGeometry, Geometry, WireframeGeometry};
pub use graph::{SceneError, SceneGraph, VisitedNode};
pub use node::{DirectionalLight, LineBasicMaterial, LineSegments, Mesh, Node, NodeKind, PhongMaterial};

pub fn crate_info() -> &'static str {
    "cubestudy-scene v0.1.0"
}
