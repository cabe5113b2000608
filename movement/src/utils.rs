//! Vector and slope helpers shared by the movers and the mode algorithms.

use nalgebra as na;

use crate::collision::{Quat, Vec3, settings::EPSILON};

/// Clamp `v` to unit length if it is longer than one.
#[inline]
pub fn clamp_to_unit(v: Vec3) -> Vec3 {
    if v.norm_squared() > 1.0 { v.normalize() } else { v }
}

/// `v` with its vertical component removed.
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Normalize `v`, or `None` when it is too short to have a direction.
#[inline]
pub fn safe_normalize(v: Vec3) -> Option<Vec3> {
    let len_sq = v.norm_squared();
    if len_sq > EPSILON {
        Some(v / len_sq.sqrt())
    } else {
        None
    }
}

/// Mirror `dir` about the plane with unit normal `normal`.
#[inline]
pub fn reflect(dir: Vec3, normal: Vec3) -> Vec3 {
    dir - normal * (2.0 * dir.dot(&normal))
}

/// Component of `v` perpendicular to the unit vector `normal`.
#[inline]
pub fn perpendicular_component(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(&normal)
}

/// Residual movement after hitting a surface with unit normal `hit_normal`.
///
/// The direction is reflected off the surface and its component along the normal is
/// discarded, leaving the part that slides along the surface, scaled by the length of
/// `direction`. Used for wall slides, ramp climbs and sliding down steep faces.
pub fn extract_residual_movement(hit_normal: Vec3, direction: Vec3) -> Vec3 {
    let movement_length = direction.norm();
    if movement_length <= EPSILON {
        return direction;
    }

    let dir = direction / movement_length;
    let Some(reflected) = safe_normalize(reflect(dir, hit_normal)) else {
        return direction;
    };

    perpendicular_component(reflected, hit_normal) * movement_length
}

/// Yaw-only rotation about +Y.
#[inline]
pub fn yaw_rotation(yaw_radians: f32) -> Quat {
    na::UnitQuaternion::from_axis_angle(&na::Vector3::y_axis(), yaw_radians)
}

/// Yaw that faces the planar direction `(x, z)`, with zero yaw looking down +Z.
#[inline]
pub fn yaw_from_xz(x: f32, z: f32) -> f32 {
    x.atan2(z)
}
