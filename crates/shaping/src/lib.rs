//! Hint radius shaping.
//!
//! Given the form under the pointer, the shaper decides how large a new form
//! placed at the hit point may be:
//! - Touching another team's form blocks placement outright.
//! - Overlapping forms of the hunted team grows the radius, up to `growth`.
//! - Forms of the fled team cap the radius at their surface distance.
//!
//! The result is a pure function of its inputs.

use echoes_core::{Form, Params, SphereSet, TeamId, Vec3};

/// Which way the shaped radius moved relative to the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Classification {
    Growing,
    Shrinking,
    #[default]
    Neutral,
}

/// Why a hit can't be placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// The pointer is over another team's form.
    Foreign,
    /// Fled forms squeezed the radius below the minimum.
    TooSmall,
}

/// Outcome of shaping a hint at a hit point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusResult {
    Blocked {
        reason: BlockReason,
        /// Scale for the hit marker.
        marker_scale: f32,
    },
    Placeable {
        /// Shaped radius in `[min_radius, max_radius]`.
        radius: f32,
        /// Radius before the hunt and flee passes.
        baseline: f32,
        classification: Classification,
        marker_scale: f32,
    },
}

impl RadiusResult {
    /// Hint radius; zero whenever placement is blocked.
    pub fn radius(&self) -> f32 {
        match self {
            Self::Blocked { .. } => 0.0,
            Self::Placeable { radius, .. } => *radius,
        }
    }

    /// Scale of the hit marker for this result.
    pub fn marker_scale(&self) -> f32 {
        match self {
            Self::Blocked { marker_scale, .. } | Self::Placeable { marker_scale, .. } => {
                *marker_scale
            }
        }
    }

    /// Whether a hold over this result may commit.
    pub fn is_placeable(&self) -> bool {
        matches!(self, Self::Placeable { .. })
    }

    pub fn classification(&self) -> Classification {
        match self {
            Self::Blocked { .. } => Classification::Neutral,
            Self::Placeable { classification, .. } => *classification,
        }
    }

    /// How far the radius moved from the baseline, as a fraction in `[0, 1]`.
    /// Drives the hint's color blend.
    pub fn blend_amount(&self) -> f32 {
        match self {
            Self::Blocked { .. } => 0.0,
            Self::Placeable { radius, baseline, .. } => {
                ((radius - baseline).abs() / baseline).clamp(0.0, 1.0)
            }
        }
    }
}

/// Distance from `point` to the surface of `form`; negative inside.
pub fn surface_distance(form: &Form, point: Vec3, params: &Params) -> f32 {
    form.center(params).distance(point) - form.radius()
}

/// Shape the hint radius for a hit on `hit_form` at `hit_point`.
pub fn shape_radius(
    hit_form: &Form,
    hit_point: Vec3,
    self_team: TeamId,
    set: &SphereSet,
    params: &Params,
) -> RadiusResult {
    if hit_form.team != self_team {
        return RadiusResult::Blocked {
            reason: BlockReason::Foreign,
            marker_scale: hit_form.radius() * params.hit_marker_scale,
        };
    }

    let baseline = (hit_form.radius() * params.shrink).max(params.min_radius);

    // Hunt: grow in proportion to how deeply the hint overlaps hunted forms.
    let overlap: f32 = set
        .bucket(self_team.hunt(params.team_count))
        .iter()
        .map(|form| {
            let d = surface_distance(form, hit_point, params);
            ((baseline - d).min(form.radius()).min(baseline) / baseline).max(0.0)
        })
        .sum();
    let mut radius = baseline * params.growth.min(1.0 + overlap);

    // Flee: never reach past the nearest fled surface, whatever the hunt gave.
    radius = set
        .bucket(self_team.flee(params.team_count))
        .iter()
        .map(|form| surface_distance(form, hit_point, params))
        .fold(radius, f32::min);

    if radius.is_nan() || radius < params.min_radius {
        log::trace!("Hint radius {} below minimum {}", radius, params.min_radius);
        return RadiusResult::Blocked {
            reason: BlockReason::TooSmall,
            marker_scale: baseline * params.hit_marker_scale,
        };
    }

    let radius = radius.min(params.max_radius);
    let classification = if radius > baseline {
        Classification::Growing
    } else if radius < baseline {
        Classification::Shrinking
    } else {
        Classification::Neutral
    };

    RadiusResult::Placeable {
        radius,
        baseline,
        classification,
        marker_scale: radius * params.hit_marker_scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echoes_core::FormId;

    const SELF: TeamId = TeamId(0);
    const HUNT: u32 = 1;
    const FLEE: u32 = 2;

    fn form_at(id: u64, team: u32, center: Vec3, radius: i64) -> Form {
        let p = Params::default();
        Form {
            id: FormId(id),
            team: TeamId(team),
            x: p.to_store(center.x),
            y: p.to_store(center.y),
            z: p.to_store(center.z),
            radius,
            creator: "0xabc".into(),
        }
    }

    fn shape(hit: &Form, point: Vec3, others: Vec<Form>) -> RadiusResult {
        let mut forms = vec![hit.clone()];
        forms.extend(others);
        let set = SphereSet::rebuild(forms, 3);
        shape_radius(hit, point, SELF, &set, &Params::default())
    }

    #[test]
    fn lone_own_form_is_neutral_at_baseline() {
        let hit = form_at(1, 0, Vec3::ZERO, 20);
        let result = shape(&hit, Vec3::ZERO, vec![]);
        assert_eq!(
            result,
            RadiusResult::Placeable {
                radius: 18.0,
                baseline: 18.0,
                classification: Classification::Neutral,
                marker_scale: 18.0 * 0.2,
            }
        );
        assert_eq!(result.blend_amount(), 0.0);
    }

    #[test]
    fn hunted_overlap_grows_to_cap() {
        // Own form r=20, hunted form r=10 centered on the hit point.
        let hit = form_at(1, 0, Vec3::ZERO, 20);
        let result = shape(&hit, Vec3::ZERO, vec![form_at(2, HUNT, Vec3::ZERO, 10)]);
        assert!((result.radius() - 27.0).abs() < 1e-3);
        assert_eq!(result.classification(), Classification::Growing);
        assert!((result.blend_amount() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn partial_hunt_overlap_grows_proportionally() {
        // Hunted surface is 9 away, so overlap is capped by its radius: min(18 - 9, 1, 18) / 18.
        let hit = form_at(1, 0, Vec3::ZERO, 20);
        let hunted = form_at(2, HUNT, Vec3::new(10.0, 0.0, 0.0), 1);
        let result = shape(&hit, Vec3::ZERO, vec![hunted]);
        let expected = 18.0 * (1.0 + 1.0 / 18.0);
        assert!((result.radius() - expected).abs() < 1e-3);
    }

    #[test]
    fn distant_hunted_forms_do_not_grow() {
        let hit = form_at(1, 0, Vec3::ZERO, 20);
        let result = shape(&hit, Vec3::ZERO, vec![form_at(2, HUNT, Vec3::new(500.0, 0.0, 0.0), 10)]);
        assert!((result.radius() - 18.0).abs() < 1e-3);
        assert_eq!(result.classification(), Classification::Neutral);
    }

    #[test]
    fn hunt_growth_never_exceeds_cap() {
        let hit = form_at(1, 0, Vec3::ZERO, 40);
        let many: Vec<Form> = (0..25)
            .map(|i| form_at(10 + i, HUNT, Vec3::new(i as f32 * 0.5, 0.0, 0.0), 50))
            .collect();
        let result = shape(&hit, Vec3::ZERO, many);
        let baseline = 40.0 * 0.9;
        assert!(result.radius() <= baseline * 1.5 + 1e-3);
        assert!((result.radius() - baseline * 1.5).abs() < 1e-3);
    }

    #[test]
    fn fled_form_caps_radius_after_growth() {
        let hit = form_at(1, 0, Vec3::ZERO, 20);
        // Fled surface exactly 5 from the hit point.
        let result = shape(
            &hit,
            Vec3::ZERO,
            vec![
                form_at(2, HUNT, Vec3::ZERO, 10),
                form_at(3, FLEE, Vec3::new(10.0, 0.0, 0.0), 5),
            ],
        );
        assert!((result.radius() - 5.0).abs() < 1e-3);
        assert_eq!(result.classification(), Classification::Shrinking);
    }

    #[test]
    fn fled_forms_dominate_for_any_distance() {
        let hit = form_at(1, 0, Vec3::ZERO, 60);
        for d in [2.0_f32, 7.5, 30.0, 80.0] {
            let fled = form_at(3, FLEE, Vec3::new(d + 4.0, 0.0, 0.0), 4);
            let result = shape(&hit, Vec3::ZERO, vec![form_at(2, HUNT, Vec3::ZERO, 30), fled]);
            assert!(result.radius() <= d + 1e-3, "radius {} > {}", result.radius(), d);
        }
    }

    #[test]
    fn below_minimum_is_blocked() {
        let hit = form_at(1, 0, Vec3::ZERO, 20);
        // Hit point sits inside a fled form: negative surface distance.
        let result = shape(&hit, Vec3::ZERO, vec![form_at(3, FLEE, Vec3::new(2.0, 0.0, 0.0), 5)]);
        assert_eq!(result.radius(), 0.0);
        assert!(!result.is_placeable());
        assert!(matches!(
            result,
            RadiusResult::Blocked { reason: BlockReason::TooSmall, .. }
        ));
    }

    #[test]
    fn foreign_hit_is_blocked_with_marker_scale() {
        let hit = form_at(1, HUNT, Vec3::ZERO, 30);
        let set = SphereSet::rebuild(vec![hit.clone()], 3);
        let result = shape_radius(&hit, Vec3::ZERO, SELF, &set, &Params::default());
        assert_eq!(
            result,
            RadiusResult::Blocked {
                reason: BlockReason::Foreign,
                marker_scale: 30.0 * 0.2,
            }
        );
        assert_eq!(result.radius(), 0.0);
    }

    #[test]
    fn radius_clamps_to_maximum() {
        let hit = form_at(1, 0, Vec3::ZERO, 100);
        let result = shape(&hit, Vec3::ZERO, vec![form_at(2, HUNT, Vec3::ZERO, 100)]);
        assert_eq!(result.radius(), 100.0);
        assert_eq!(result.classification(), Classification::Growing);
    }

    #[test]
    fn tiny_forms_keep_minimum_baseline() {
        let hit = form_at(1, 0, Vec3::ZERO, 1);
        let result = shape(&hit, Vec3::ZERO, vec![]);
        assert_eq!(result.radius(), 1.0);
    }

    #[test]
    fn shaping_is_deterministic() {
        let hit = form_at(1, 0, Vec3::ZERO, 35);
        let others = vec![
            form_at(2, HUNT, Vec3::new(3.0, 1.0, 0.0), 12),
            form_at(3, FLEE, Vec3::new(-40.0, 0.0, 0.0), 8),
        ];
        let a = shape(&hit, Vec3::new(0.0, 0.0, 35.0), others.clone());
        let b = shape(&hit, Vec3::new(0.0, 0.0, 35.0), others);
        assert_eq!(a, b);
    }
}
