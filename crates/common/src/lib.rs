//! Shared types used by every cubestudy crate.

mod types;

pub use types::{Color, NodeId, Transform, Viewport};
