use crate::pointer::{PointerButton, PointerEvent};
use cubestudy_render::PerspectiveCamera;
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

const POLAR_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    Rotate,
    Dolly,
    Pan,
}

/// Orbit controls: drag to circle the camera around a target point.
///
/// Primary drag rotates, middle drag and the wheel dolly, secondary drag
/// pans in screen space. Changes are applied immediately (no damping).
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enabled: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    drag: Option<Drag>,
    last: Vec2,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl OrbitControls {
    /// Bind controls to `camera`, orbiting the origin. The camera is turned
    /// to face the target right away.
    pub fn new(camera: &mut PerspectiveCamera) -> Self {
        let mut controls = Self {
            target: Vec3::ZERO,
            enabled: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            drag: None,
            last: Vec2::ZERO,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        };
        controls.update(camera);
        controls
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feed one pointer event. `viewport_height` is the container height in
    /// logical pixels. Returns true when the camera moved.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        camera: &mut PerspectiveCamera,
        viewport_height: f32,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        let height = viewport_height.max(1.0);

        match *event {
            PointerEvent::Down { button, position } => {
                self.drag = Some(match button {
                    PointerButton::Primary => Drag::Rotate,
                    PointerButton::Middle => Drag::Dolly,
                    PointerButton::Secondary => Drag::Pan,
                });
                self.last = position;
                tracing::trace!(?button, "orbit drag started");
                false
            }
            PointerEvent::Move { position } => {
                let Some(drag) = self.drag else {
                    return false;
                };
                let delta = position - self.last;
                self.last = position;
                match drag {
                    Drag::Rotate => {
                        self.theta_delta -= TAU * delta.x / height * self.rotate_speed;
                        self.phi_delta -= TAU * delta.y / height * self.rotate_speed;
                    }
                    Drag::Dolly => {
                        if delta.y > 0.0 {
                            self.scale /= self.zoom_scale();
                        } else if delta.y < 0.0 {
                            self.scale *= self.zoom_scale();
                        }
                    }
                    Drag::Pan => self.pan(delta, camera, height),
                }
                self.update(camera);
                true
            }
            PointerEvent::Up { .. } => {
                self.drag = None;
                false
            }
            PointerEvent::Wheel { delta_y } => {
                if delta_y < 0.0 {
                    self.scale *= self.zoom_scale();
                } else if delta_y > 0.0 {
                    self.scale /= self.zoom_scale();
                } else {
                    return false;
                }
                self.update(camera);
                true
            }
        }
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    fn pan(&mut self, delta: Vec2, camera: &PerspectiveCamera, height: f32) {
        // Scale so that the point under the target moves with the pointer.
        let target_distance =
            (camera.position - self.target).length() * (camera.fov_degrees.to_radians() / 2.0).tan();
        let left = 2.0 * delta.x * target_distance / height * self.pan_speed;
        let up = 2.0 * delta.y * target_distance / height * self.pan_speed;
        self.pan_offset += -camera.right() * left + camera.camera_up() * up;
    }

    /// Apply accumulated rotation, dolly and pan to the camera.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let offset = camera.position - self.target;
        let radius = offset.length().max(f32::EPSILON);

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        theta += self.theta_delta;
        phi += self.phi_delta;

        let min_phi = self.min_polar_angle.max(POLAR_EPSILON);
        let max_phi = self.max_polar_angle.min(PI - POLAR_EPSILON);
        phi = phi.clamp(min_phi, max_phi.max(min_phi));

        // min_distance wins over a smaller max_distance; NaN bounds are ignored.
        let radius = (radius * self.scale)
            .min(self.max_distance)
            .max(self.min_distance);

        self.target += self.pan_offset;
        let offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        camera.position = self.target + offset;
        camera.look_at(self.target);

        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;
    }
}
