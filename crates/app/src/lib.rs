//! Lesson driver: wires a renderer, a scene and a camera to a host.
//!
//! One [`App`] per lesson. Construction locates the container, creates the
//! renderer, assembles the scene, sizes everything once and requests the
//! first frame. From then on the host delivers ticks to [`App::on_frame`]
//! and events through [`HostEvents`].
//!
//! # Invariants
//! - One renderer, one scene and one camera per App.
//! - The scene is sealed before the first frame; node count never changes.
//! - Ticks never overlap: a tick is only accepted while a frame is scheduled.
//! - Dropping the App stops its loop and unsubscribes every listener.

pub mod app;
pub mod config;
pub mod events;
pub mod frame;
pub mod headless;
pub mod host;
pub mod lesson;

pub use app::{App, AppError, AppSummary, HostEvents};
pub use config::{CameraConfig, ConfigError, LessonConfig, LightConfig, ModelConfig};
pub use events::{EventSource, Resize, Subscription};
pub use frame::{
    FrameDriver, FrameError, FrameScheduler, FrameState, FrameTime, ManualScheduler, StopHandle,
    TickOutcome,
};
pub use headless::{HeadlessContainer, HeadlessHost};
pub use host::{Container, Host};
pub use lesson::{AssembledScene, Lesson, UpdateStep};

pub fn crate_info() -> &'static str {
    "cubestudy-app v0.1.0"
}
