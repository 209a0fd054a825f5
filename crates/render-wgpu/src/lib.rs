//! wgpu render backend for the cubestudy lessons.
//!
//! Draws Phong-shaded meshes lit by the scene's first directional light and
//! unlit line segments. The renderer owns its surface, the way a canvas
//! renderer owns its canvas.
//!
//! # Invariants
//! - Renderer never mutates scene state.
//! - GPU buffers are created once per node; the node set is fixed after sealing.

mod gpu;
mod shaders;

pub use gpu::{GpuError, RendererOptions, WgpuRenderer};
