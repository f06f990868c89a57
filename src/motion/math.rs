//! Motion domain: vector helpers shared by every mode policy.
//!
//! Every normalization in here is guarded: a degenerate input yields a zero
//! vector (or identity rotation) instead of NaN.

use bevy::prelude::*;

/// Length below which a vector is treated as having no direction.
pub const DIRECTION_EPSILON: f32 = 1e-5;

/// Unit vector along `vector`, or zero when it is shorter than
/// [`DIRECTION_EPSILON`].
pub fn normalize_or_zero_eps(vector: Vec3) -> Vec3 {
    let len_sq = vector.length_squared();
    if !len_sq.is_finite() || len_sq <= DIRECTION_EPSILON * DIRECTION_EPSILON {
        return Vec3::ZERO;
    }
    vector / len_sq.sqrt()
}

/// Frame-rate independent blend factor for exponential smoothing.
///
/// `0.0` at `dt == 0`, approaching `1.0` as `dt` grows.
pub fn sharpness_blend(sharpness: f32, dt: f32) -> f32 {
    1.0 - (-sharpness * dt).exp()
}

/// Remove the component of `vector` along `normal`.
pub fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    let n = normal.normalize_or_zero();
    vector - n * vector.dot(n)
}

/// Component of `vector` along `onto`. Zero when `onto` is zero.
pub fn project(vector: Vec3, onto: Vec3) -> Vec3 {
    let len_sq = onto.length_squared();
    if len_sq <= f32::EPSILON {
        return Vec3::ZERO;
    }
    onto * (vector.dot(onto) / len_sq)
}

/// Clamp a vector's length to `max`.
pub fn clamp_length(vector: Vec3, max: f32) -> Vec3 {
    let len_sq = vector.length_squared();
    if len_sq > max * max {
        vector * (max / len_sq.sqrt())
    } else {
        vector
    }
}

/// Direction along `surface_normal`'s tangent plane that keeps the heading of
/// `direction` as seen from `up`.
pub fn tangent_to_surface(direction: Vec3, surface_normal: Vec3, up: Vec3) -> Vec3 {
    let direction_right = direction.cross(up);
    surface_normal.cross(direction_right).normalize_or_zero()
}

/// Rotation whose forward (-Z) points along `forward` with +Y as close to
/// `up` as possible.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let back = -forward.normalize_or_zero();
    if back == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut right = up.cross(back).normalize_or_zero();
    if right == Vec3::ZERO {
        // forward parallel to up: any perpendicular works
        right = back.any_orthonormal_vector();
    }
    let up = back.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize()
}

/// Shortest rotation taking direction `from` onto direction `to`.
pub fn from_to_rotation(from: Vec3, to: Vec3) -> Quat {
    let from = from.normalize_or_zero();
    let to = to.normalize_or_zero();
    if from == Vec3::ZERO || to == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(from, to)
}

/// Spherical interpolation between two directions, magnitudes lerped.
pub fn slerp_direction(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    let from_len = from.length();
    let to_len = to.length();
    if from_len <= f32::EPSILON || to_len <= f32::EPSILON {
        return from.lerp(to, t);
    }
    let arc = Quat::from_rotation_arc(from / from_len, to / to_len);
    let direction = Quat::IDENTITY.slerp(arc, t) * (from / from_len);
    direction * (from_len + (to_len - from_len) * t)
}
