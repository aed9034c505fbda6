//! Hint sphere and hit marker shown under the pointer.

use echoes_core::Vec3;
use shaping::Classification;

/// Preview of the form a hold would commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hint {
    pub position: Vec3,
    /// Zero whenever hidden.
    pub radius: f32,
    pub visible: bool,
    pub classification: Classification,
    pub color: Vec3,
}

impl Default for Hint {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            radius: 0.0,
            visible: false,
            classification: Classification::Neutral,
            color: Vec3::ONE,
        }
    }
}

impl Hint {
    /// Show the hint; a zero radius hides it instead.
    pub fn show(&mut self, position: Vec3, radius: f32, classification: Classification, color: Vec3) {
        self.position = position;
        self.radius = radius;
        self.classification = classification;
        self.color = color;
        self.visible = radius > 0.0;
    }

    pub fn hide(&mut self) {
        self.radius = 0.0;
        self.visible = false;
        self.classification = Classification::Neutral;
    }

    /// Whether holding now would be allowed to commit.
    pub fn is_committable(&self) -> bool {
        self.visible && self.radius > 0.0
    }
}

/// Cone marker at the ray hit, pointing out of the hit sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitMarker {
    pub position: Vec3,
    pub normal: Vec3,
    pub scale: f32,
    pub color: Vec3,
    pub visible: bool,
}

impl Default for HitMarker {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::Z,
            scale: 1.0,
            color: Vec3::ZERO,
            visible: false,
        }
    }
}

impl HitMarker {
    /// Place the marker on the surface at `position`, facing `normal`.
    pub fn show(&mut self, position: Vec3, normal: Vec3, scale: f32, color: Vec3) {
        self.position = position;
        self.normal = normal;
        self.scale = scale;
        self.color = color;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}
