//! Rendering Adapter: renderer-agnostic interface plus the camera model.
//!
//! # Invariants
//! - Renderers never add or remove scene nodes.
//! - Camera projection only changes through `update_projection_matrix`.
//!
//! The [`Renderer`] trait is implemented by the GPU backend and by
//! [`DebugTextRenderer`], which the headless host and tests use.

mod camera;
mod renderer;

pub use camera::PerspectiveCamera;
pub use renderer::{DebugTextRenderer, RenderError, Renderer};

pub fn crate_info() -> &'static str {
    "cubestudy-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
