//! Perspective camera, its GPU uniform and damped orbit controls.
//!
//! The camera always looks at a target point. [`OrbitController`] collects
//! pointer input as pending rotation, pan and dolly, and applies a fraction of
//! it every frame in [`OrbitController::update`], which gives the damped glide
//! after the pointer is released.

use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector2, Vector3};
use winit::{
    event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
    keyboard::ModifiersState,
};

pub const FOVY_DEGREES: f32 = 75.0;
pub const ZNEAR: f32 = 0.1;
pub const ZFAR: f32 = 100.0;
/// Share of the pending motion applied each frame.
pub const DAMPING_FACTOR: f32 = 0.05;
/// Dolly factor per wheel notch.
pub const ZOOM_SCALE: f32 = 0.95;
pub const MIN_DISTANCE: f32 = 0.1;
pub const MAX_DISTANCE: f32 = 100.0;

const POLAR_EPSILON: f32 = 1e-6;
/// Pixels per wheel line when the platform reports pixel deltas.
const PIXELS_PER_LINE: f32 = 100.0;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P) -> Self {
        Self {
            position: position.into(),
            target: Point3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: f32, height: f32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width / height,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.aspect = width / height;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fovy(&self) -> Rad<f32> {
        self.fovy
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view: [[f32; 4]; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view: Matrix4::identity().into(),
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        let view = camera.calc_matrix();
        self.view = view.into();
        self.view_proj = (projection.calc_matrix() * view).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Drag {
    None,
    Rotate,
    Pan,
}

#[derive(Debug)]
pub struct OrbitController {
    /// Pending azimuth and polar rotation in radians.
    rotate: Vector2<f32>,
    /// Pending pan in viewport pixels.
    pan: Vector2<f32>,
    /// Dolly factor applied once on the next update.
    scale: f32,
    drag: Drag,
    cursor: Option<Vector2<f32>>,
    touch: Option<(u64, Vector2<f32>)>,
    modifiers: ModifiersState,
    viewport_height: f32,
}

impl OrbitController {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            rotate: Vector2::new(0.0, 0.0),
            pan: Vector2::new(0.0, 0.0),
            scale: 1.0,
            drag: Drag::None,
            cursor: None,
            touch: None,
            modifiers: ModifiersState::empty(),
            viewport_height: viewport_height.max(1.0),
        }
    }

    /// Height the rotation speed is measured against.
    pub fn resize(&mut self, viewport_height: f32) {
        self.viewport_height = viewport_height.max(1.0);
    }

    /// Queue a drag of `dx`, `dy` pixels. A drag across the full viewport height is one turn.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.rotate.x -= TAU * dx / self.viewport_height;
        self.rotate.y -= TAU * dy / self.viewport_height;
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pan += Vector2::new(dx, dy);
    }

    /// Positive `notches` move the camera towards the target.
    pub fn dolly(&mut self, notches: f32) {
        self.scale *= ZOOM_SCALE.powf(notches);
    }

    pub fn is_idle(&self) -> bool {
        self.rotate.magnitude2() < 1e-12 && self.pan.magnitude2() < 1e-8 && self.scale == 1.0
    }

    /// Feed a window event. Returns whether the controller used it.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.drag = match (state, button) {
                    (ElementState::Pressed, MouseButton::Left)
                        if self.modifiers.shift_key() || self.modifiers.control_key() =>
                    {
                        Drag::Pan
                    }
                    (ElementState::Pressed, MouseButton::Left) => Drag::Rotate,
                    (ElementState::Pressed, MouseButton::Right) => Drag::Pan,
                    (ElementState::Released, _) => Drag::None,
                    _ => self.drag,
                };
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vector2::new(position.x as f32, position.y as f32);
                if let Some(last) = self.cursor.replace(position) {
                    let delta = position - last;
                    match self.drag {
                        Drag::Rotate => self.rotate(delta.x, delta.y),
                        Drag::Pan => self.pan(delta.x, delta.y),
                        Drag::None => return false,
                    }
                    return true;
                }
                false
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.drag = Drag::None;
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                if notches != 0.0 {
                    self.dolly(notches.signum());
                }
                true
            }
            WindowEvent::Touch(touch) => {
                let position = Vector2::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => {
                        if self.touch.is_none() {
                            self.touch = Some((touch.id, position));
                        }
                    }
                    TouchPhase::Moved => {
                        if let Some((id, last)) = self.touch
                            && id == touch.id
                        {
                            let delta = position - last;
                            self.rotate(delta.x, delta.y);
                            self.touch = Some((id, position));
                        }
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        if matches!(self.touch, Some((id, _)) if id == touch.id) {
                            self.touch = None;
                        }
                    }
                }
                true
            }
            _ => false,
        }
    }

    /// Apply one frame worth of the pending motion to `camera`.
    pub fn update(&mut self, camera: &mut Camera, projection: &Projection) {
        let offset = camera.position - camera.target;
        let radius = offset.magnitude();
        if radius <= f32::EPSILON {
            return;
        }

        // azimuth around +Y measured from +Z, polar angle measured from +Y
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta += self.rotate.x * DAMPING_FACTOR;
        phi += self.rotate.y * DAMPING_FACTOR;
        phi = phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let radius = (radius * self.scale).clamp(MIN_DISTANCE, MAX_DISTANCE - f32::EPSILON);

        if self.pan.magnitude2() > 0.0 {
            let view = camera.calc_matrix();
            // rows of the view rotation are the camera axes in world space
            let right = Vector3::new(view.x.x, view.y.x, view.z.x);
            let up = Vector3::new(view.x.y, view.y.y, view.z.y);
            let target_distance = radius * (projection.fovy().0 / 2.0).tan();
            let step = self.pan * DAMPING_FACTOR;
            let world_per_pixel = 2.0 * target_distance / self.viewport_height;
            camera.target += (-right * step.x + up * step.y) * world_per_pixel;
        }

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        camera.position = camera.target
            + Vector3::new(
                radius * sin_phi * sin_theta,
                radius * cos_phi,
                radius * sin_phi * cos_theta,
            );

        self.rotate *= 1.0 - DAMPING_FACTOR;
        self.pan *= 1.0 - DAMPING_FACTOR;
        self.scale = 1.0;
    }
}
