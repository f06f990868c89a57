//! Motion domain: collision-free flying.

use bevy::prelude::*;

use crate::motion::math;
use crate::tuning::MotionTuning;

pub fn noclip_velocity(
    velocity: Vec3,
    move_input: Vec3,
    up: Vec3,
    jump_held: bool,
    dt: f32,
    tuning: &MotionTuning,
) -> Vec3 {
    let vertical_input = if jump_held { 1.0 } else { 0.0 };
    let target =
        math::normalize_or_zero_eps(move_input + up * vertical_input) * tuning.noclip_move_speed;
    velocity.lerp(target, math::sharpness_blend(tuning.noclip_sharpness, dt))
}
