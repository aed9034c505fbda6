//! Ray/sphere hit testing against the sphere set.

use echoes_core::{Form, Params, SphereSet, Vec3};
use rapier3d::na::{Point3, Vector3};
use rapier3d::parry::query::{Ray as ParryRay, RayCast};
use rapier3d::parry::shape::Ball;

/// A world-space ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; `direction` is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point `distance` units along the ray.
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Result of a pick.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// The form that was hit.
    pub form: &'a Form,
    /// World position of the hit.
    pub point: Vec3,
    /// Render-space center of the hit form.
    pub center: Vec3,
    /// Squared distance from the ray origin to the hit.
    pub distance_sq: f32,
}

impl Hit<'_> {
    /// Outward surface normal at the hit point.
    pub fn normal(&self) -> Vec3 {
        (self.point - self.center).normalize_or_zero()
    }
}

/// Distance along `ray` to a sphere. Rays starting inside report the exit point;
/// spheres behind the origin are missed.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    if radius <= 0.0 {
        return None;
    }
    // Cast in the ball's local frame so no isometry is needed.
    let local = ParryRay::new(
        Point3::new(ray.origin.x - center.x, ray.origin.y - center.y, ray.origin.z - center.z),
        Vector3::new(ray.direction.x, ray.direction.y, ray.direction.z),
    );
    Ball::new(radius).cast_local_ray(&local, f32::MAX, false)
}

/// The hit closest to the ray origin across every bucket, or `None` when the
/// set is empty or nothing is crossed. Exact ties keep the first form found.
pub fn nearest_hit<'a>(ray: &Ray, set: &'a SphereSet, params: &Params) -> Option<Hit<'a>> {
    let mut best: Option<Hit<'a>> = None;

    for form in set.iter() {
        let center = form.center(params);
        let Some(distance) = ray_sphere(ray, center, form.radius()) else {
            continue;
        };
        let point = ray.point_at(distance);
        let distance_sq = point.distance_squared(ray.origin);

        if best.as_ref().is_some_and(|b| b.distance_sq <= distance_sq) {
            continue;
        }
        best = Some(Hit {
            form,
            point,
            center,
            distance_sq,
        });
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use echoes_core::{FormId, TeamId};

    fn params() -> Params {
        Params::default()
    }

    /// A form whose render-space center is `center`.
    fn form_at(id: u64, team: u32, center: Vec3, radius: i64) -> Form {
        let p = params();
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

    fn down_z() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 100.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn ray_sphere_hits_front_surface() {
        let d = ray_sphere(&down_z(), Vec3::ZERO, 10.0).unwrap();
        assert!((d - 90.0).abs() < 1e-3);
    }

    #[test]
    fn ray_sphere_from_inside_reports_exit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let d = ray_sphere(&ray, Vec3::ZERO, 5.0).unwrap();
        assert!((d - 5.0).abs() < 1e-4);
    }

    #[test]
    fn ray_sphere_misses_behind_and_beside() {
        assert!(ray_sphere(&down_z(), Vec3::new(0.0, 0.0, 200.0), 10.0).is_none());
        assert!(ray_sphere(&down_z(), Vec3::new(50.0, 0.0, 0.0), 10.0).is_none());
    }

    #[test]
    fn empty_set_has_no_hit() {
        let set = SphereSet::new(3);
        assert!(nearest_hit(&down_z(), &set, &params()).is_none());
    }

    #[test]
    fn miss_everything_has_no_hit() {
        let forms = vec![form_at(1, 0, Vec3::new(40.0, 0.0, 0.0), 5)];
        let set = SphereSet::rebuild(forms, 3);
        assert!(nearest_hit(&down_z(), &set, &params()).is_none());
    }

    #[test]
    fn nearest_wins_regardless_of_order() {
        let near = form_at(1, 2, Vec3::new(0.0, 0.0, 40.0), 10);
        let far = form_at(2, 0, Vec3::new(0.0, 0.0, -40.0), 10);

        for forms in [vec![near.clone(), far.clone()], vec![far.clone(), near.clone()]] {
            let set = SphereSet::rebuild(forms, 3);
            let hit = nearest_hit(&down_z(), &set, &params()).unwrap();
            assert_eq!(hit.form.id, FormId(1));
            assert!((hit.point.z - 50.0).abs() < 1e-2);
            assert!((hit.distance_sq - 2500.0).abs() < 1.0);
        }
    }

    #[test]
    fn nearest_wins_within_one_bucket() {
        let forms = vec![
            form_at(1, 1, Vec3::new(0.0, 0.0, -60.0), 10),
            form_at(2, 1, Vec3::new(0.0, 0.0, 20.0), 10),
            form_at(3, 1, Vec3::new(0.0, 0.0, -10.0), 10),
        ];
        let set = SphereSet::rebuild(forms, 3);
        let hit = nearest_hit(&down_z(), &set, &params()).unwrap();
        assert_eq!(hit.form.id, FormId(2));
    }

    #[test]
    fn exact_tie_keeps_first_found() {
        let a = form_at(1, 0, Vec3::ZERO, 10);
        let b = form_at(2, 1, Vec3::ZERO, 10);
        let set = SphereSet::rebuild(vec![b, a], 3);
        let hit = nearest_hit(&down_z(), &set, &params()).unwrap();
        // Bucket 0 is visited before bucket 1.
        assert_eq!(hit.form.id, FormId(1));
    }

    #[test]
    fn hit_normal_points_out_of_the_sphere() {
        let set = SphereSet::rebuild(vec![form_at(1, 0, Vec3::ZERO, 10)], 3);
        let hit = nearest_hit(&down_z(), &set, &params()).unwrap();
        assert!((hit.normal() - Vec3::Z).length() < 1e-3);
    }
}
