//! Sanity checks for tuning values the per-step code assumes.

use super::MotionTuning;

/// A single rejected tuning field.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: &'static str,
    pub value: f32,
    pub reason: &'static str,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' = {} {}", self.field, self.value, self.reason)
    }
}

macro_rules! check_non_negative {
    ($errors:expr, $tuning:expr, $($field:ident),+ $(,)?) => {
        $(
            let value = $tuning.$field;
            if !value.is_finite() {
                $errors.push(ValidationError {
                    field: stringify!($field),
                    value,
                    reason: "is not finite",
                });
            } else if value < 0.0 {
                $errors.push(ValidationError {
                    field: stringify!($field),
                    value,
                    reason: "must not be negative",
                });
            }
        )+
    };
}

/// Validate all tuning values.
/// Returns a list of validation errors, empty if the tuning is usable.
pub fn validate_tuning(tuning: &MotionTuning) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_non_negative!(
        errors,
        tuning,
        max_stable_move_speed,
        stable_movement_sharpness,
        orientation_sharpness,
        max_air_move_speed,
        air_acceleration_speed,
        drag,
        jump_speed,
        jump_pre_grounding_grace_time,
        jump_post_grounding_grace_time,
        rolling_speed,
        max_roll_time,
        stopped_time,
        noclip_move_speed,
        noclip_sharpness,
    );

    if !tuning.gravity.is_finite() {
        errors.push(ValidationError {
            field: "gravity",
            value: tuning.gravity.length(),
            reason: "is not finite",
        });
    } else if tuning.orient_towards_gravity && tuning.gravity.length_squared() <= f32::EPSILON {
        errors.push(ValidationError {
            field: "gravity",
            value: 0.0,
            reason: "must be non-zero while orient_towards_gravity is set",
        });
    }

    errors
}
