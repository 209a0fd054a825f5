//! Pointer input mapped onto camera motion.
//!
//! # Invariants
//! - Controls only touch the camera's position and look-at target.
//! - The camera always looks at the orbit target after an update.

pub mod orbit;
pub mod pointer;

pub use orbit::OrbitControls;
pub use pointer::{PointerButton, PointerEvent};

pub fn crate_info() -> &'static str {
    "cubestudy-input v0.1.0"
}
