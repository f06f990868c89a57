//! Motion domain: the active movement mode and its enter/exit side effects.

use crate::motion::animation::{AnimTrigger, AnimationSink};
use crate::motion::default_mode::DefaultState;
use crate::motion::motor::{CharacterMotor, CollisionSolver};
use crate::motion::rolling::RollState;
use crate::tuning::MotionTuning;

/// Mode identity without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum MotionModeKind {
    #[default]
    Default,
    Rolling,
    NoClip,
}

/// The active mode. Per-mode bookkeeping lives in the variant, so it is
/// dropped on exit and starts fresh on every entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionMode {
    Default(DefaultState),
    Rolling(RollState),
    NoClip,
}

impl Default for MotionMode {
    fn default() -> Self {
        MotionMode::Default(DefaultState::default())
    }
}

impl MotionMode {
    /// Blank variant for `kind`; [`MotionMode::on_enter`] fills it in.
    pub fn fresh(kind: MotionModeKind) -> Self {
        match kind {
            MotionModeKind::Default => MotionMode::Default(DefaultState::default()),
            MotionModeKind::Rolling => MotionMode::Rolling(RollState::default()),
            MotionModeKind::NoClip => MotionMode::NoClip,
        }
    }

    pub fn kind(&self) -> MotionModeKind {
        match self {
            MotionMode::Default(_) => MotionModeKind::Default,
            MotionMode::Rolling(_) => MotionModeKind::Rolling,
            MotionMode::NoClip => MotionModeKind::NoClip,
        }
    }

    pub fn on_enter(
        &mut self,
        tuning: &MotionTuning,
        motor: &mut dyn CharacterMotor,
        animator: &mut dyn AnimationSink,
    ) {
        match self {
            MotionMode::Default(_) => {}
            MotionMode::Rolling(roll) => {
                animator.set_trigger(AnimTrigger::Roll);
                roll.on_enter(tuning, motor);
            }
            MotionMode::NoClip => {
                for solver in CollisionSolver::ALL {
                    motor.set_collision_solving(solver, false);
                }
            }
        }
    }

    pub fn on_exit(&mut self, motor: &mut dyn CharacterMotor) {
        match self {
            MotionMode::Default(_) | MotionMode::Rolling(_) => {}
            MotionMode::NoClip => {
                for solver in CollisionSolver::ALL {
                    motor.set_collision_solving(solver, true);
                }
            }
        }
    }
}
