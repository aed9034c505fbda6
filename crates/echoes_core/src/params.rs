//! Tuning parameters and conversions between render space and the store's integer domain.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest integer the store accepts exactly (2^53 - 1).
pub const INT_MAX: i64 = (1 << 53) - 1;

/// Tunables for placement, picking and the hold gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Number of teams; fixed for the lifetime of a client.
    pub team_count: u32,
    /// Store coordinates are multiplied by this to get render-space positions.
    pub position_scale: f64,
    /// Smallest radius a form may have (r0).
    pub min_radius: f32,
    /// Largest radius a form may have (r1).
    pub max_radius: f32,
    /// Cap on the hunt multiplier.
    pub growth: f32,
    /// Baseline shrink applied to the touched form's radius.
    pub shrink: f32,
    /// Traces are drawn slightly inside the committed radius.
    pub inner: f32,
    /// Hit marker scale relative to the radius it marks.
    pub hit_marker_scale: f32,
    /// How long a press must be held before it commits.
    pub hold_ms: u64,
    /// Squared pointer travel (pixels) that cancels a hold.
    pub hold_move_threshold_sq: f32,
    /// Camera near plane.
    pub near: f32,
    /// Camera far plane.
    pub far: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            team_count: 3,
            position_scale: 3e-13,
            min_radius: 1.0,
            max_radius: 100.0,
            growth: 1.5,
            shrink: 0.9,
            inner: 0.95,
            hit_marker_scale: 0.2,
            hold_ms: 1000,
            hold_move_threshold_sq: 20.0,
            near: 1.0,
            far: 1e4,
        }
    }
}

impl Params {
    /// How long a press must be held to commit.
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    /// Radius of a sphere that encloses every representable form.
    pub fn bound_radius(&self) -> f32 {
        (INT_MAX as f64 * self.position_scale) as f32 + self.max_radius
    }

    /// Store coordinate to render space.
    pub fn to_render(&self, coordinate: i64) -> f32 {
        (coordinate as f64 * self.position_scale) as f32
    }

    /// Render-space coordinate back to the store domain, clamped to the representable range.
    pub fn to_store(&self, coordinate: f32) -> i64 {
        let scaled = coordinate as f64 / self.position_scale;
        if scaled.is_nan() {
            return 0;
        }
        clamp_round(scaled, -INT_MAX as f64, INT_MAX as f64) as i64
    }

    /// Radius rounded and clamped into `[min_radius, max_radius]`.
    pub fn store_radius(&self, radius: f32) -> i64 {
        clamp_round(radius as f64, self.min_radius as f64, self.max_radius as f64) as i64
    }
}

/// `round(clamp(value, lo, hi))`, the rounding path used for every committed field.
pub fn clamp_round(value: f64, lo: f64, hi: f64) -> f64 {
    value.clamp(lo, hi).round()
}
