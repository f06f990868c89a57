//! Motion domain: per-frame input snapshot and camera-relative frames.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::motion::math;

/// Everything the controller needs to know about the player's intent for one
/// frame. Edges (`*_down`) are true for exactly one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub move_axis_forward: f32,
    pub move_axis_right: f32,
    pub camera_rotation: Quat,
    pub jump_down: bool,
    pub jump_held: bool,
    pub roll_down: bool,
    pub noclip_down: bool,
    pub aiming: bool,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            move_axis_forward: 0.0,
            move_axis_right: 0.0,
            camera_rotation: Quat::IDENTITY,
            jump_down: false,
            jump_held: false,
            roll_down: false,
            noclip_down: false,
            aiming: false,
        }
    }
}

impl InputSnapshot {
    /// Axes in the local input frame (right = +X, forward = -Z), clamped to
    /// unit length.
    pub fn clamped_move_axes(&self) -> Vec3 {
        let right = self.move_axis_right.clamp(-1.0, 1.0);
        let forward = self.move_axis_forward.clamp(-1.0, 1.0);
        math::clamp_length(Vec3::new(right, 0.0, -forward), 1.0)
    }
}

/// Squared length below which a projected camera axis counts as degenerate.
const PLANAR_EPSILON: f32 = 1e-8;

/// Camera orientation flattened onto the character plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlanarFrame {
    pub direction: Vec3,
    pub rotation: Quat,
}

impl CameraPlanarFrame {
    /// Project camera-forward onto the plane orthogonal to `up`, falling back
    /// to camera-up when the camera looks straight along `up`.
    pub fn resolve(camera_rotation: Quat, up: Vec3) -> Self {
        let projected = math::project_on_plane(camera_rotation * Vec3::NEG_Z, up);
        let direction = if projected.length_squared() > PLANAR_EPSILON {
            projected.normalize()
        } else {
            math::project_on_plane(camera_rotation * Vec3::Y, up).normalize_or_zero()
        };
        Self {
            direction,
            rotation: math::look_rotation(direction, up),
        }
    }
}
