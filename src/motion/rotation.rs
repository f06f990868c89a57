//! Motion domain: facing policy shared by Default and NoClip modes.

use bevy::prelude::*;

use crate::motion::math;
use crate::tuning::MotionTuning;

/// Smoothly turn towards `look_input`, then optionally stand the character
/// up against gravity.
pub fn smoothed_rotation(
    current: Quat,
    look_input: Vec3,
    forward: Vec3,
    up: Vec3,
    dt: f32,
    tuning: &MotionTuning,
) -> Quat {
    let mut rotation = current;

    if look_input != Vec3::ZERO && tuning.orientation_sharpness > 0.0 {
        let t = math::sharpness_blend(tuning.orientation_sharpness, dt);
        let smoothed = math::normalize_or_zero_eps(math::slerp_direction(forward, look_input, t));
        if smoothed != Vec3::ZERO {
            rotation = math::look_rotation(smoothed, up);
        }
    }

    if tuning.orient_towards_gravity {
        rotation = math::from_to_rotation(rotation * Vec3::Y, -tuning.gravity) * rotation;
    }

    rotation
}
