use crate::camera::PerspectiveCamera;
use cubestudy_common::Viewport;
use cubestudy_scene::{NodeKind, SceneGraph};
use std::fmt::Write as _;

/// Errors a renderer can report for a single frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(String),
    #[error("out of GPU memory")]
    OutOfMemory,
    #[error("backend error: {0}")]
    Backend(String),
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer is bound to one output surface. It reads the scene and the
/// camera and never changes the scene structure.
pub trait Renderer {
    /// The output type produced by one frame.
    type Output;

    /// Ratio between drawing-buffer pixels and logical pixels.
    fn set_pixel_ratio(&mut self, ratio: f32);

    /// Resize the output to `width` x `height` logical pixels.
    fn set_size(&mut self, width: u32, height: u32);

    /// Draw one frame of `scene` as seen from `camera`.
    fn render(
        &mut self,
        scene: &SceneGraph,
        camera: &PerspectiveCamera,
    ) -> Result<Self::Output, RenderError>;
}

/// Debug text renderer.
///
/// Produces a human-readable dump of every frame. Used by the headless CLI,
/// by logging, and to test the render interface without a GPU.
#[derive(Debug)]
pub struct DebugTextRenderer {
    viewport: Viewport,
    frames: u64,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self {
            viewport: Viewport::new(0, 0),
            frames: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.viewport.pixel_ratio = ratio;
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.viewport.width = width;
        self.viewport.height = height;
        tracing::trace!(width, height, "debug renderer resized");
    }

    fn render(
        &mut self,
        scene: &SceneGraph,
        camera: &PerspectiveCamera,
    ) -> Result<String, RenderError> {
        self.frames += 1;
        let (buf_w, buf_h) = self.viewport.drawing_buffer_size();

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} ({}x{} @{}x, buffer {}x{}) ===",
            self.frames,
            self.viewport.width,
            self.viewport.height,
            self.viewport.pixel_ratio,
            buf_w,
            buf_h
        );
        let _ = writeln!(out, "Nodes: {}", scene.node_count());
        let p = camera.position;
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3} near={} far={}",
            p.x, p.y, p.z, camera.fov_degrees, camera.aspect, camera.near, camera.far
        );

        for visited in scene.traverse() {
            let node = visited.node;
            let t = &node.transform;
            let indent = "  ".repeat(visited.depth + 1);
            let detail = match &node.kind {
                NodeKind::Group => String::new(),
                NodeKind::DirectionalLight(light) => {
                    format!(" color={} intensity={}", light.color, light.intensity)
                }
                NodeKind::Mesh(mesh) => format!(
                    " color={} triangles={}",
                    mesh.material.color,
                    mesh.geometry.triangle_count()
                ),
                NodeKind::LineSegments(lines) => format!(
                    " color={} edges={}",
                    lines.material.color,
                    lines.geometry.edge_count()
                ),
            };
            let hidden = if visited.visible { "" } else { " (hidden)" };
            let _ = writeln!(
                out,
                "{indent}[{}] {} pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}, {:.3}){detail}{hidden}",
                visited.id,
                node.kind.label(),
                t.position.x,
                t.position.y,
                t.position.z,
                t.rotation.x,
                t.rotation.y,
                t.rotation.z,
            );
        }

        Ok(out)
    }
}
