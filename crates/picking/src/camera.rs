//! Perspective camera that turns pointer positions into world rays.

use crate::raycast::Ray;
use echoes_core::{Mat4, Params, Vec2, Vec3};

/// Look-at perspective camera. Orbit and dolly controls live outside the client;
/// they only need to call `set_look_at`.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Eye position.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            eye: Vec3::Z,
            target: Vec3::ZERO,
            fov_degrees: 60.0,
            near: 1.0,
            far: 1e4,
            aspect: 1.0,
        }
    }
}

impl PerspectiveCamera {
    /// The starting view: just outside the bounds of every representable form,
    /// looking down -Z.
    pub fn home(params: &Params) -> Self {
        let mut camera = Self {
            near: params.near,
            far: params.far,
            ..Default::default()
        };
        camera.recenter(params);
        camera
    }

    /// Return to the starting view, keeping the aspect ratio.
    pub fn recenter(&mut self, params: &Params) {
        let start = params.bound_radius() * 2.0;
        self.set_look_at(
            Vec3::new(0.0, 0.0, start + params.max_radius),
            Vec3::new(0.0, 0.0, start),
        );
    }

    /// Place the eye and aim it at `target`. Orbit controls call this.
    pub fn set_look_at(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.target = target;
    }

    /// Update aspect ratio (call on resize).
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.aspect = width / height.max(1.0);
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the eye through a pointer given in viewport pixels (origin top-left).
    pub fn ray_from_pointer(&self, pointer: Vec2, viewport: Vec2) -> Ray {
        let ndc = pointer_to_ndc(pointer, viewport);
        let inverse = self.view_projection_matrix().inverse();
        // Unproject onto the far plane; glam's RH projection maps depth to [0, 1].
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.eye, far - self.eye)
    }
}

/// Viewport pixels to normalized device coordinates, y up.
pub fn pointer_to_ndc(pointer: Vec2, viewport: Vec2) -> Vec2 {
    let size = viewport.max(Vec2::ONE);
    (pointer / size * 2.0 - Vec2::ONE) * Vec2::new(1.0, -1.0)
}
