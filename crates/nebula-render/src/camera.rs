//! Perspective orbit camera with damped pointer/wheel input

use nebula_core::{mat4_mul, Vec3};
use nebula_runtime::{CameraConfig, OrbitControl};
use std::f32::consts::TAU;

/// Wheel zoom factor per notch at `zoom_speed = 1`
pub const ZOOM_STEP: f32 = 0.95;

const PITCH_LIMIT: f32 = 1.56;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 90.0;

/// A perspective camera orbiting a target point.
///
/// Input is buffered: drags and wheel notches accumulate into pending
/// motion, and every [`OrbitCamera::update`] applies a `damping` fraction of
/// the pending rotation and pan, decaying the rest. Zoom applies in full on
/// the next update.
pub struct OrbitCamera {
    /// Camera position
    pub position: Vec3,
    /// Target point the camera looks at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance from target
    pub distance: f32,
    /// Horizontal angle in radians
    pub yaw: f32,
    /// Vertical angle in radians
    pub pitch: f32,

    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,

    /// Drawable height in pixels; drag distances are measured against it
    pub viewport_height: f32,

    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan: Vec3,
    pending_zoom: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let target = Vec3::from_array(config.target);
        let offset = Vec3::from_array(config.position) - target;
        let distance = offset.length().max(MIN_DISTANCE);

        let mut camera = Self {
            position: Vec3::from_array(config.position),
            target,
            up: Vec3::UP,
            fov: config.fov,
            near: config.near,
            far: config.far,
            aspect,
            distance,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            damping: config.damping,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            viewport_height: 720.0,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan: Vec3::ZERO,
            pending_zoom: 1.0,
        };
        camera.update_orbit();
        camera
    }

    /// Half the vertical view extent at unit depth
    pub fn tan_half_fov(&self) -> f32 {
        (self.fov.to_radians() / 2.0).tan()
    }

    /// Update position based on orbit parameters
    pub fn update_orbit(&mut self) {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();

        self.position = Vec3::new(self.target.x + x, self.target.y + y, self.target.z + z);
    }

    /// Pointer drag in pixels: one viewport height of drag is a full turn
    pub fn on_pointer_drag(&mut self, dx: f32, dy: f32) {
        let height = self.viewport_height.max(1.0);
        self.pending_yaw -= TAU * dx / height * self.rotate_speed;
        self.pending_pitch += TAU * dy / height * self.rotate_speed;
    }

    /// Secondary-button drag in pixels: slides the target in the view plane
    pub fn on_pan_drag(&mut self, dx: f32, dy: f32) {
        let height = self.viewport_height.max(1.0);
        let world_per_pixel = 2.0 * self.distance * self.tan_half_fov() / height;
        let right = Vec3::from_array(self.right_vector());
        let up = Vec3::from_array(self.up_vector());
        self.pending_pan = self.pending_pan + right * (-dx * world_per_pixel)
            + up * (dy * world_per_pixel);
    }

    /// Wheel input in notches; positive moves closer
    pub fn on_wheel(&mut self, notches: f32) {
        self.pending_zoom *= ZOOM_STEP.powf(notches * self.zoom_speed);
    }

    /// Apply buffered input and recompute the position
    pub fn update(&mut self) {
        self.yaw += self.pending_yaw * self.damping;
        self.pitch = (self.pitch + self.pending_pitch * self.damping).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.target = self.target + self.pending_pan * self.damping;

        let decay = 1.0 - self.damping;
        self.pending_yaw *= decay;
        self.pending_pitch *= decay;
        self.pending_pan = self.pending_pan * decay;

        self.distance = (self.distance * self.pending_zoom).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.pending_zoom = 1.0;

        self.update_orbit();
    }

    /// Whether buffered rotation or pan is still noticeable
    pub fn is_settling(&self) -> bool {
        self.pending_yaw.abs() > 1e-5
            || self.pending_pitch.abs() > 1e-5
            || self.pending_pan.length() > 1e-5
    }

    /// Get the view matrix (4x4, column-major)
    pub fn view_matrix(&self) -> [[f32; 4]; 4] {
        let f = (self.target - self.position).normalized();
        let s = f.cross(&self.up).normalized();
        let u = s.cross(&f);

        [
            [s.x, u.x, -f.x, 0.0],
            [s.y, u.y, -f.y, 0.0],
            [s.z, u.z, -f.z, 0.0],
            [
                -s.dot(&self.position),
                -u.dot(&self.position),
                f.dot(&self.position),
                1.0,
            ],
        ]
    }

    /// Get the projection matrix (4x4, column-major), depth mapped to [0, 1]
    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        let f = 1.0 / self.tan_half_fov();
        let range = self.near - self.far;

        [
            [f / self.aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, self.far / range, -1.0],
            [0.0, 0.0, self.near * self.far / range, 0.0],
        ]
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> [[f32; 4]; 4] {
        mat4_mul(&self.projection_matrix(), &self.view_matrix())
    }

    /// Get camera right vector (world space)
    pub fn right_vector(&self) -> [f32; 3] {
        let f = (self.target - self.position).normalized();
        f.cross(&self.up).normalized().to_array()
    }

    /// Get camera up vector (world space, perpendicular to both forward and right)
    pub fn up_vector(&self) -> [f32; 3] {
        let f = (self.target - self.position).normalized();
        let s = f.cross(&self.up).normalized();
        s.cross(&f).to_array()
    }
}

impl OrbitControl for OrbitCamera {
    fn update(&mut self) {
        OrbitCamera::update(self);
    }

    fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}
