//! Mouse picking against the chart's own cubes.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// A world-space ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Axis-aligned box given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Slab test. Returns the distance along the ray to the entry point, or
    /// to the exit point when the origin is inside the box.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;
        let t_near = t0.min(t1).max_element();
        let t_far = t0.max(t1).min_element();

        if t_near.is_nan() || t_far.is_nan() || t_far < t_near.max(0.0) {
            return None;
        }
        Some(if t_near >= 0.0 { t_near } else { t_far })
    }
}

/// Ray through the point `ndc` (x right, y up, both in [-1, 1]) for a camera
/// with the given view-projection matrix.
pub fn ray_from_ndc(view_proj: Mat4, ndc: Vec2) -> Option<Ray> {
    let inv = view_proj.inverse();
    let unproject = |z: f32| {
        let p = inv * Vec4::new(ndc.x, ndc.y, z, 1.0);
        (p.w.abs() > f32::EPSILON).then(|| p.truncate() / p.w)
    };
    // wgpu depth runs from 0 (near) to 1 (far).
    let near = unproject(0.0)?;
    let far = unproject(1.0)?;
    let direction = (far - near).try_normalize()?;
    Some(Ray {
        origin: near,
        direction,
    })
}

/// Index and distance of the nearest box the ray hits.
pub fn pick_nearest<I>(ray: &Ray, boxes: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = (usize, Aabb)>,
{
    boxes
        .into_iter()
        .filter_map(|(idx, aabb)| aabb.intersect(ray).map(|t| (idx, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn down_ray(x: f32, z: f32) -> Ray {
        Ray {
            origin: Vec3::new(x, 10.0, z),
            direction: Vec3::NEG_Y,
        }
    }

    #[test]
    fn slab_test_hits_top_face() {
        let aabb = Aabb::from_center_half_extents(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(0.5));
        let t = aabb.intersect(&down_ray(0.2, -0.2)).expect("hit");
        assert_relative_eq!(t, 8.5, epsilon = 1e-5);
        assert!(aabb.intersect(&down_ray(0.6, 0.0)).is_none());
    }

    #[test]
    fn box_behind_ray_is_missed() {
        let aabb = Aabb::from_center_half_extents(Vec3::new(0.0, 20.0, 0.0), Vec3::splat(0.5));
        assert!(aabb.intersect(&down_ray(0.0, 0.0)).is_none());
    }

    #[test]
    fn nearest_of_stacked_boxes_wins() {
        let low = Aabb::from_center_half_extents(Vec3::new(0.0, 0.5, 0.0), Vec3::splat(0.2));
        let high = Aabb::from_center_half_extents(Vec3::new(0.0, 0.9, 0.0), Vec3::splat(0.2));
        let aside = Aabb::from_center_half_extents(Vec3::new(3.0, 5.0, 0.0), Vec3::splat(0.2));
        let hit = pick_nearest(&down_ray(0.0, 0.0), [(0, low), (1, high), (2, aside)]);
        assert_eq!(hit.map(|(i, _)| i), Some(1));
    }

    #[test]
    fn centre_of_screen_ray_points_at_target() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(1.0, 1.5, 0.1, 100.0);
        let ray = ray_from_ndc(proj * view, Vec2::ZERO).expect("ray");
        assert_relative_eq!(ray.direction.z, -1.0, epsilon = 1e-4);
        assert_relative_eq!(ray.origin.z, 4.9, epsilon = 1e-3);

        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        assert!(aabb.intersect(&ray).is_some());
    }
}
