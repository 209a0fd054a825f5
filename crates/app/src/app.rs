use crate::config::LessonConfig;
use crate::events::{EventSource, Resize, Subscription};
use crate::frame::{FrameDriver, FrameError, FrameScheduler, FrameState, FrameTime, StopHandle};
use crate::host::{Container, Host};
use crate::lesson::{self, Lesson, UpdateStep};
use cubestudy_common::{NodeId, Viewport};
use cubestudy_input::orbit::OrbitControls;
use cubestudy_input::pointer::PointerEvent;
use cubestudy_render::{PerspectiveCamera, RenderError, Renderer};
use cubestudy_scene::{SceneError, SceneGraph};
use glam::Vec3;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Errors surfaced by an [`App`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("container not found: {0}")]
    ContainerNotFound(String),
    #[error("renderer creation failed: {0}")]
    Renderer(String),
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("frame loop error: {0}")]
    Frame(#[from] FrameError),
}

/// Event sources the host feeds. Clones share listeners, so the host keeps
/// one copy and hands another to [`App::new`].
#[derive(Debug, Clone, Default)]
pub struct HostEvents {
    pub resize: EventSource<Resize>,
    pub pointer: EventSource<PointerEvent>,
}

impl HostEvents {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Snapshot of an App's state, for logs and headless reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSummary {
    pub lesson: Lesson,
    pub frames: u64,
    pub state: String,
    pub nodes: usize,
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
    pub aspect: f32,
    pub resizes: u64,
    pub camera_position: [f32; 3],
    pub tracked_rotation: [f32; 3],
}

/// Everything the frame body and the event listeners touch.
struct Stage<R, C> {
    renderer: R,
    container: C,
    scene: SceneGraph,
    camera: PerspectiveCamera,
    controls: Option<OrbitControls>,
    tracked: NodeId,
    update: UpdateStep,
    pixel_ratio: f32,
    viewport: Viewport,
    resizes: u64,
}

impl<R: Renderer, C: Container> Stage<R, C> {
    /// Re-query the container and resize camera and renderer to match.
    fn resize(&mut self) {
        let viewport = self.container.viewport();
        if viewport.pixel_ratio != self.pixel_ratio {
            self.pixel_ratio = viewport.pixel_ratio;
            self.renderer.set_pixel_ratio(viewport.pixel_ratio);
        }
        match viewport.aspect() {
            Some(aspect) => {
                self.camera.aspect = aspect;
                self.camera.update_projection_matrix();
            }
            None => tracing::warn!(
                width = viewport.width,
                height = viewport.height,
                "container has no area; keeping camera aspect"
            ),
        }
        self.renderer.set_size(viewport.width, viewport.height);
        self.viewport = viewport;
        self.resizes += 1;
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            pixel_ratio = viewport.pixel_ratio,
            aspect = self.camera.aspect,
            "resized"
        );
    }

    fn pointer(&mut self, event: &PointerEvent) {
        let height = self.container.viewport().height as f32;
        if let Some(controls) = self.controls.as_mut() {
            controls.handle(event, &mut self.camera, height);
        }
    }

    fn frame(&mut self, time: FrameTime) -> Result<R::Output, AppError> {
        let output = self.renderer.render(&self.scene, &self.camera)?;
        self.update.apply(&mut self.scene, time)?;
        Ok(output)
    }
}

/// Run `f` on the stage behind `weak`, if it is still alive and not borrowed.
fn with_stage<R, C>(weak: &Weak<RefCell<Stage<R, C>>>, f: impl FnOnce(&mut Stage<R, C>)) {
    let Some(stage) = weak.upgrade() else {
        return;
    };
    match stage.try_borrow_mut() {
        Ok(mut stage) => f(&mut stage),
        Err(_) => tracing::warn!("event delivered while a frame is running; dropped"),
    }
}

/// One lesson bound to one host container.
pub struct App<R: Renderer, C: Container> {
    lesson: Lesson,
    stage: Rc<RefCell<Stage<R, C>>>,
    driver: FrameDriver,
    _subscriptions: Vec<Subscription>,
}

impl<R, C> App<R, C>
where
    R: Renderer + 'static,
    C: Container + 'static,
{
    /// Bootstrap a lesson: find the container, create the renderer, assemble
    /// the scene, size everything once and request the first frame.
    pub fn new<H, F, E>(
        host: &H,
        config: &LessonConfig,
        lesson: Lesson,
        events: &HostEvents,
        scheduler: &mut impl FrameScheduler,
        make_renderer: F,
    ) -> Result<Self, AppError>
    where
        H: Host<Container = C>,
        F: FnOnce(&C) -> Result<R, E>,
        E: std::fmt::Display,
    {
        let selector = config.container_selector.as_str();
        let container = host
            .query_selector(selector)
            .ok_or_else(|| AppError::ContainerNotFound(selector.to_string()))?;

        let mut renderer =
            make_renderer(&container).map_err(|e| AppError::Renderer(e.to_string()))?;
        let viewport = container.viewport();
        renderer.set_pixel_ratio(viewport.pixel_ratio);

        let assembled = lesson::assemble(lesson, config, viewport)?;
        let mut stage = Stage {
            renderer,
            container,
            scene: assembled.scene,
            camera: assembled.camera,
            controls: assembled.controls,
            tracked: assembled.tracked,
            update: assembled.update,
            pixel_ratio: viewport.pixel_ratio,
            viewport,
            resizes: 0,
        };
        stage.resize();
        let has_controls = stage.controls.is_some();
        let stage = Rc::new(RefCell::new(stage));

        let mut subscriptions = Vec::new();
        let weak = Rc::downgrade(&stage);
        subscriptions.push(
            events
                .resize
                .subscribe(move |_: &Resize| with_stage(&weak, Stage::resize)),
        );
        if has_controls {
            let weak = Rc::downgrade(&stage);
            subscriptions.push(
                events
                    .pointer
                    .subscribe(move |event: &PointerEvent| {
                        with_stage(&weak, |stage| stage.pointer(event))
                    }),
            );
        }

        let mut driver = FrameDriver::new();
        driver.start(scheduler)?;
        tracing::info!(
            %lesson,
            selector,
            width = viewport.width,
            height = viewport.height,
            "lesson started"
        );

        Ok(Self {
            lesson,
            stage,
            driver,
            _subscriptions: subscriptions,
        })
    }

    /// Deliver one host tick. Renders, then applies the lesson's update.
    ///
    /// Returns the renderer's output, or `None` when the loop is stopped and
    /// the tick was ignored. A render failure stops the loop.
    pub fn on_frame(
        &mut self,
        timestamp_ms: f64,
        scheduler: &mut impl FrameScheduler,
    ) -> Result<Option<R::Output>, AppError> {
        let stage = &self.stage;
        let mut output = None;
        let result = self
            .driver
            .tick(FrameTime::from_millis(timestamp_ms), scheduler, |time| {
                output = Some(stage.borrow_mut().frame(time)?);
                Ok::<(), AppError>(())
            });
        if let Err(e) = &result {
            tracing::error!(error = %e, lesson = %self.lesson, "frame failed");
        }
        result?;
        Ok(output)
    }

    pub fn lesson(&self) -> Lesson {
        self.lesson
    }

    pub fn camera(&self) -> PerspectiveCamera {
        self.stage.borrow().camera.clone()
    }

    pub fn node_count(&self) -> usize {
        self.stage.borrow().scene.node_count()
    }

    pub fn tracked_rotation(&self) -> Vec3 {
        let stage = self.stage.borrow();
        stage
            .scene
            .get(stage.tracked)
            .map(|node| node.transform.rotation)
            .unwrap_or(Vec3::ZERO)
    }

    /// How many times the resize handler has run, construction included.
    pub fn resize_count(&self) -> u64 {
        self.stage.borrow().resizes
    }

    pub fn frame_state(&self) -> FrameState {
        self.driver.state()
    }

    pub fn frames(&self) -> u64 {
        self.driver.ticks()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.driver.stop_handle()
    }

    /// Run `f` with the renderer, e.g. to inspect a debug backend.
    pub fn with_renderer<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.stage.borrow().renderer)
    }

    pub fn summary(&self) -> AppSummary {
        let stage = self.stage.borrow();
        AppSummary {
            lesson: self.lesson,
            frames: self.driver.ticks(),
            state: self.driver.state().to_string(),
            nodes: stage.scene.node_count(),
            width: stage.viewport.width,
            height: stage.viewport.height,
            pixel_ratio: stage.viewport.pixel_ratio,
            aspect: stage.camera.aspect,
            resizes: stage.resizes,
            camera_position: stage.camera.position.to_array(),
            tracked_rotation: stage
                .scene
                .get(stage.tracked)
                .map(|node| node.transform.rotation.to_array())
                .unwrap_or_default(),
        }
    }
}

impl<R: Renderer, C: Container> Drop for App<R, C> {
    fn drop(&mut self) {
        self.driver.stop_handle().stop();
        tracing::debug!(lesson = %self.lesson, ticks = self.driver.ticks(), "lesson dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ManualScheduler;
    use crate::headless::{HeadlessContainer, HeadlessHost};
    use cubestudy_input::pointer::PointerButton;
    use cubestudy_render::DebugTextRenderer;
    use glam::Vec2;
    use std::cell::Cell;

    const SELECTOR: &str = "#webgl-container";

    struct Fixture {
        host: HeadlessHost,
        container: HeadlessContainer,
        events: HostEvents,
        scheduler: ManualScheduler,
    }

    fn fixture(width: u32, height: u32) -> Fixture {
        let container = HeadlessContainer::new(Viewport::new(width, height));
        Fixture {
            host: HeadlessHost::new().with_container(SELECTOR, container.clone()),
            container,
            events: HostEvents::new(),
            scheduler: ManualScheduler::new(),
        }
    }

    fn start(fx: &mut Fixture, lesson: Lesson) -> App<DebugTextRenderer, HeadlessContainer> {
        App::new(
            &fx.host,
            &LessonConfig::default(),
            lesson,
            &fx.events,
            &mut fx.scheduler,
            |_: &HeadlessContainer| Ok::<_, RenderError>(DebugTextRenderer::new()),
        )
        .unwrap()
    }

    /// Renderer that fails on a chosen frame and counts size changes.
    struct FlakyRenderer {
        fail_on: u64,
        frames: u64,
        sizes: Rc<Cell<u32>>,
    }

    impl Renderer for FlakyRenderer {
        type Output = ();

        fn set_pixel_ratio(&mut self, _ratio: f32) {}

        fn set_size(&mut self, _width: u32, _height: u32) {
            self.sizes.set(self.sizes.get() + 1);
        }

        fn render(&mut self, _: &SceneGraph, _: &PerspectiveCamera) -> Result<(), RenderError> {
            self.frames += 1;
            if self.frames == self.fail_on {
                return Err(RenderError::Surface("lost".into()));
            }
            Ok(())
        }
    }

    #[test]
    fn missing_container_is_an_error() {
        let mut fx = fixture(800, 600);
        fx.host = HeadlessHost::new();
        let err = App::<DebugTextRenderer, HeadlessContainer>::new(
            &fx.host,
            &LessonConfig::default(),
            Lesson::Basic,
            &fx.events,
            &mut fx.scheduler,
            |_: &HeadlessContainer| Ok::<_, RenderError>(DebugTextRenderer::new()),
        )
        .err()
        .unwrap();
        assert!(matches!(err, AppError::ContainerNotFound(ref s) if s == SELECTOR));
        assert!(!fx.scheduler.is_pending());
    }

    #[test]
    fn renderer_factory_failure() {
        let mut fx = fixture(800, 600);
        let err = App::<DebugTextRenderer, HeadlessContainer>::new(
            &fx.host,
            &LessonConfig::default(),
            Lesson::Basic,
            &fx.events,
            &mut fx.scheduler,
            |_: &HeadlessContainer| Err("no adapter"),
        )
        .err()
        .unwrap();
        assert!(matches!(err, AppError::Renderer(ref s) if s == "no adapter"));
    }

    #[test]
    fn construction_sizes_once_and_schedules() {
        let mut fx = fixture(800, 600);
        let app = start(&mut fx, Lesson::Basic);
        assert_eq!(app.resize_count(), 1);
        assert!((app.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(app.frame_state(), FrameState::Scheduled);
        assert!(fx.scheduler.is_pending());
        app.with_renderer(|r| assert_eq!(r.viewport(), Viewport::new(800, 600)));
    }

    #[test]
    fn resize_event_updates_aspect() {
        let mut fx = fixture(800, 600);
        let app = start(&mut fx, Lesson::Basic);
        for (w, h) in [(1024, 512), (300, 900), (1, 1)] {
            fx.container.resize(w, h);
            fx.events.resize.emit(&Resize);
            assert!((app.camera().aspect - w as f32 / h as f32).abs() < 1e-6);
            app.with_renderer(|r| {
                assert_eq!(r.viewport().width, w);
                assert_eq!(r.viewport().height, h);
            });
        }
        assert_eq!(app.resize_count(), 4);
    }

    #[test]
    fn zero_sized_container_keeps_aspect() {
        let mut fx = fixture(800, 400);
        let app = start(&mut fx, Lesson::Basic);
        fx.container.resize(0, 400);
        fx.events.resize.emit(&Resize);
        assert_eq!(app.camera().aspect, 2.0);
        assert!(app.camera().projection_matrix().is_finite());
        assert_eq!(app.resize_count(), 2);
    }

    #[test]
    fn pixel_ratio_change_reaches_renderer() {
        let mut fx = fixture(400, 300);
        let app = start(&mut fx, Lesson::Basic);
        fx.container.set_pixel_ratio(2.0);
        fx.events.resize.emit(&Resize);
        app.with_renderer(|r| assert_eq!(r.viewport().drawing_buffer_size(), (800, 600)));
    }

    #[test]
    fn basic_lesson_spins_with_time() {
        let mut fx = fixture(800, 600);
        let mut app = start(&mut fx, Lesson::Basic);
        for (ms, expected) in [(0.0, 0.0), (1000.0, 1.0), (2500.0, 2.5)] {
            assert!(fx.scheduler.take_pending());
            let frame = app.on_frame(ms, &mut fx.scheduler).unwrap();
            assert!(frame.is_some());
            assert_eq!(app.tracked_rotation(), Vec3::new(expected, expected, 0.0));
        }
        assert_eq!(app.frames(), 3);
    }

    #[test]
    fn render_happens_before_update() {
        let mut fx = fixture(800, 600);
        let mut app = start(&mut fx, Lesson::Basic);
        app.on_frame(1000.0, &mut fx.scheduler).unwrap();
        // The second frame still shows the rotation set after the first.
        let dump = app.on_frame(2000.0, &mut fx.scheduler).unwrap().unwrap();
        assert!(dump.contains("rot=(1.000, 1.000, 0.000)"), "{dump}");
    }

    #[test]
    fn geometry_lesson_stays_still() {
        let mut fx = fixture(800, 600);
        let mut app = start(&mut fx, Lesson::Geometry);
        for i in 0..50 {
            app.on_frame(i as f64 * 16.7, &mut fx.scheduler).unwrap();
            assert_eq!(app.tracked_rotation(), Vec3::ZERO);
        }
    }

    #[test]
    fn node_count_never_changes() {
        for (lesson, expected) in [(Lesson::Basic, 2), (Lesson::Geometry, 4)] {
            let mut fx = fixture(640, 480);
            let mut app = start(&mut fx, lesson);
            assert_eq!(app.node_count(), expected);
            for i in 0..30 {
                app.on_frame(i as f64 * 16.0, &mut fx.scheduler).unwrap();
            }
            assert_eq!(app.node_count(), expected);
        }
    }

    #[test]
    fn pointer_drag_orbits_in_geometry_lesson() {
        let mut fx = fixture(400, 400);
        let app = start(&mut fx, Lesson::Geometry);
        assert_eq!(fx.events.pointer.listener_count(), 1);

        let button = PointerButton::Primary;
        fx.events.pointer.emit(&PointerEvent::Down {
            button,
            position: Vec2::ZERO,
        });
        fx.events.pointer.emit(&PointerEvent::Move {
            position: Vec2::new(100.0, 0.0),
        });
        fx.events.pointer.emit(&PointerEvent::Up { button });

        let cam = app.camera();
        assert!((cam.position - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-4, "{:?}", cam.position);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn basic_lesson_ignores_pointer() {
        let mut fx = fixture(400, 400);
        let _app = start(&mut fx, Lesson::Basic);
        assert_eq!(fx.events.pointer.listener_count(), 0);
    }

    #[test]
    fn render_failure_stops_the_loop() {
        let mut fx = fixture(800, 600);
        let sizes = Rc::new(Cell::new(0));
        let s = Rc::clone(&sizes);
        let mut app = App::new(
            &fx.host,
            &LessonConfig::default(),
            Lesson::Basic,
            &fx.events,
            &mut fx.scheduler,
            move |_: &HeadlessContainer| {
                Ok::<_, RenderError>(FlakyRenderer {
                    fail_on: 2,
                    frames: 0,
                    sizes: s,
                })
            },
        )
        .unwrap();
        assert_eq!(sizes.get(), 1);

        assert!(app.on_frame(0.0, &mut fx.scheduler).unwrap().is_some());
        fx.scheduler.take_pending();
        let err = app.on_frame(16.0, &mut fx.scheduler).unwrap_err();
        assert!(matches!(err, AppError::Render(RenderError::Surface(_))));
        assert_eq!(app.frame_state(), FrameState::Stopped);
        assert!(!fx.scheduler.is_pending());
        // The update step did not run for the failed frame.
        assert_eq!(app.tracked_rotation(), Vec3::ZERO);

        assert!(app.on_frame(32.0, &mut fx.scheduler).unwrap().is_none());
    }

    #[test]
    fn stop_handle_ends_loop_after_current_tick() {
        let mut fx = fixture(800, 600);
        let mut app = start(&mut fx, Lesson::Basic);
        app.on_frame(0.0, &mut fx.scheduler).unwrap();
        app.stop_handle().stop();
        fx.scheduler.take_pending();
        assert!(app.on_frame(16.0, &mut fx.scheduler).unwrap().is_none());
        assert_eq!(app.frame_state(), FrameState::Stopped);
        assert!(!fx.scheduler.is_pending());
        assert_eq!(app.frames(), 1);
    }

    #[test]
    fn stop_before_first_tick_skips_rendering() {
        let mut fx = fixture(800, 600);
        let mut app = start(&mut fx, Lesson::Basic);
        app.stop_handle().stop();
        assert!(app.on_frame(0.0, &mut fx.scheduler).unwrap().is_none());
        assert_eq!(app.frames(), 0);
        app.with_renderer(|r| assert_eq!(r.frames(), 0));
    }

    #[test]
    fn dropping_app_unsubscribes_and_stops() {
        let mut fx = fixture(400, 400);
        let app = start(&mut fx, Lesson::Geometry);
        let stop = app.stop_handle();
        assert_eq!(fx.events.resize.listener_count(), 1);
        assert_eq!(fx.events.pointer.listener_count(), 1);
        drop(app);
        assert_eq!(fx.events.resize.listener_count(), 0);
        assert_eq!(fx.events.pointer.listener_count(), 0);
        assert!(stop.is_stopped());
        assert_eq!(fx.events.resize.emit(&Resize), 0);
    }

    #[test]
    fn summary_serializes() {
        let mut fx = fixture(800, 600);
        let mut app = start(&mut fx, Lesson::Basic);
        app.on_frame(1000.0, &mut fx.scheduler).unwrap();
        let summary = app.summary();
        assert_eq!(summary.frames, 1);
        assert_eq!(summary.nodes, 2);
        assert_eq!(summary.state, "scheduled");
        assert_eq!(summary.tracked_rotation, [1.0, 1.0, 0.0]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["lesson"], "basic");
        assert_eq!(json["width"], 800);
    }
}
