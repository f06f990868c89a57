//! Tuning domain: every numeric and boolean knob of the motion controller.

mod loader;
mod validation;


pub use loader::{DEFAULT_TUNING_PATH, TuningLoadError, load_tuning, load_tuning_or_default, parse_tuning};
pub use validation::{ValidationError, validate_tuning};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::motion::ColliderId;

/// What the character turns to face while moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrientationMethod {
    TowardsCamera,
    #[default]
    TowardsMovement,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    // Stable movement
    pub max_stable_move_speed: f32,
    pub stable_movement_sharpness: f32,
    pub orientation_sharpness: f32,
    pub orientation_method: OrientationMethod,

    // Air movement
    pub max_air_move_speed: f32,
    pub air_acceleration_speed: f32,
    pub drag: f32,

    // Jumping
    pub allow_jumping_when_sliding: bool,
    pub allow_double_jump: bool,
    pub allow_wall_jump: bool,
    pub jump_speed: f32,
    /// How long a jump press is remembered before touching ground.
    pub jump_pre_grounding_grace_time: f32,
    /// How long after leaving ground a jump is still allowed.
    pub jump_post_grounding_grace_time: f32,

    // Roll
    pub rolling_speed: f32,
    pub max_roll_time: f32,
    /// Dwell after the roll stops before control returns.
    pub stopped_time: f32,

    // NoClip
    pub noclip_move_speed: f32,
    pub noclip_sharpness: f32,

    // Misc
    pub gravity: Vec3,
    pub orient_towards_gravity: bool,
    pub ignored_colliders: Vec<ColliderId>,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            max_stable_move_speed: 10.0,
            stable_movement_sharpness: 15.0,
            orientation_sharpness: 10.0,
            orientation_method: OrientationMethod::TowardsMovement,
            max_air_move_speed: 10.0,
            air_acceleration_speed: 5.0,
            drag: 0.1,
            allow_jumping_when_sliding: false,
            allow_double_jump: false,
            allow_wall_jump: false,
            jump_speed: 10.0,
            jump_pre_grounding_grace_time: 0.0,
            jump_post_grounding_grace_time: 0.0,
            rolling_speed: 10.0,
            max_roll_time: 1.5,
            stopped_time: 0.0,
            noclip_move_speed: 10.0,
            noclip_sharpness: 15.0,
            gravity: Vec3::new(0.0, -30.0, 0.0),
            orient_towards_gravity: true,
            ignored_colliders: Vec::new(),
        }
    }
}

impl MotionTuning {
    /// Apex height of a single jump from flat ground: h = v² / (2g).
    pub fn single_jump_height(&self) -> f32 {
        let g = self.gravity.length();
        if g <= f32::EPSILON {
            return f32::INFINITY;
        }
        self.jump_speed * self.jump_speed / (2.0 * g)
    }

    /// Horizontal distance covered by an unobstructed roll charge.
    pub fn roll_distance(&self) -> f32 {
        self.rolling_speed * self.max_roll_time
    }
}
