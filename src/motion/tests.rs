//! Motion domain: unit tests for the controller, mode machine and policies.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::FRAC_PI_2;

use super::math;
use super::{
    AnimParam, AnimTrigger, AnimationCue, AnimationSink, CameraPlanarFrame, CharacterController, CharacterMotor,
    ColliderId, CollisionSolver, GroundingReport, HitStabilityReport, InputSnapshot,
    MAX_BUFFERED_CUES, MotionModeKind, PlayerCharacterController, SurfaceHit,
};
use crate::tuning::{MotionTuning, OrientationMethod};

const DT: f32 = 0.1;

/// Motor double whose grounding is set by the test and which records every
/// request the controller makes.
struct ScriptedMotor {
    up: Vec3,
    forward: Vec3,
    grounding: GroundingReport,
    last_grounding: GroundingReport,
    unground_requests: Vec<f32>,
    solver_calls: Vec<(CollisionSolver, bool)>,
}

impl ScriptedMotor {
    fn new(grounding: GroundingReport) -> Self {
        Self {
            up: Vec3::Y,
            forward: Vec3::NEG_Z,
            grounding,
            last_grounding: grounding,
            unground_requests: Vec::new(),
            solver_calls: Vec::new(),
        }
    }

    fn grounded() -> Self {
        Self::new(GroundingReport::stable(Vec3::Y))
    }

    fn airborne() -> Self {
        Self::new(GroundingReport::airborne())
    }

    fn set_grounding(&mut self, report: GroundingReport) {
        self.last_grounding = self.grounding;
        self.grounding = report;
    }

    fn solver_count(&self, solver: CollisionSolver, active: bool) -> usize {
        self.solver_calls
            .iter()
            .filter(|(s, a)| *s == solver && *a == active)
            .count()
    }
}

impl CharacterMotor for ScriptedMotor {
    fn character_up(&self) -> Vec3 {
        self.up
    }

    fn character_forward(&self) -> Vec3 {
        self.forward
    }

    fn grounding_status(&self) -> GroundingReport {
        self.grounding
    }

    fn last_grounding_status(&self) -> GroundingReport {
        self.last_grounding
    }

    fn force_unground(&mut self, duration: f32) {
        self.unground_requests.push(duration);
    }

    fn set_collision_solving(&mut self, solver: CollisionSolver, active: bool) {
        self.solver_calls.push((solver, active));
    }
}

fn controller(tuning: MotionTuning) -> PlayerCharacterController {
    PlayerCharacterController::new(tuning)
}

/// Run one full callback sequence (without hits) and return the new velocity.
fn step(
    controller: &mut PlayerCharacterController,
    motor: &mut ScriptedMotor,
    velocity: Vec3,
    dt: f32,
) -> Vec3 {
    controller.before_character_update(motor, dt);
    let _ = controller.update_rotation(motor, Quat::IDENTITY, dt);
    let velocity = controller.update_velocity(motor, velocity, dt);
    controller.after_character_update(motor, dt);
    controller.post_grounding_update(motor, dt);
    velocity
}

fn jump_press() -> InputSnapshot {
    InputSnapshot {
        jump_down: true,
        jump_held: true,
        ..default()
    }
}

fn unstable_hit(normal: Vec3) -> (SurfaceHit, HitStabilityReport) {
    (
        SurfaceHit {
            collider: ColliderId(1),
            normal,
            point: Vec3::ZERO,
        },
        HitStabilityReport { is_stable: false },
    )
}

// ============================================================================
// Smoothing and reorientation
// ============================================================================

#[test]
fn test_blend_converges_for_any_sharpness() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..200 {
        let sharpness = rng.random_range(0.01..50.0f32);
        let current = Vec3::new(rng.random_range(-20.0..20.0), 0.0, rng.random_range(-20.0..20.0));
        let target = Vec3::new(rng.random_range(-20.0..20.0), 0.0, rng.random_range(-20.0..20.0));

        let at_zero = current.lerp(target, math::sharpness_blend(sharpness, 0.0));
        assert_eq!(at_zero, current);

        let at_limit = current.lerp(target, math::sharpness_blend(sharpness, 1.0e4));
        assert!((at_limit - target).length() < 1e-3);

        let dt = rng.random_range(0.0..1.0f32);
        let blend = math::sharpness_blend(sharpness, dt);
        assert!((0.0..=1.0).contains(&blend));
    }
}

#[test]
fn test_grounded_reorientation_preserves_speed() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let motor = ScriptedMotor::grounded();
    for _ in 0..200 {
        let velocity = Vec3::new(
            rng.random_range(-10.0..10.0),
            rng.random_range(-2.0..2.0),
            rng.random_range(-10.0..10.0),
        );
        let normal = Vec3::new(
            rng.random_range(-0.6..0.6),
            1.0,
            rng.random_range(-0.6..0.6),
        )
        .normalize();

        let reoriented =
            motor.direction_tangent_to_surface(velocity, normal) * velocity.length();
        assert!((reoriented.length() - velocity.length()).abs() < 1e-3);
        assert!(reoriented.dot(normal).abs() < 1e-3);
    }
}

#[test]
fn test_grounded_speed_approaches_max_monotonically() {
    let mut controller = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::grounded();
    controller.set_inputs(
        &mut motor,
        &InputSnapshot {
            move_axis_right: 1.0,
            ..default()
        },
    );
    assert!((controller.move_input() - Vec3::X).length() < 1e-5);

    let mut velocity = Vec3::ZERO;
    let mut previous_speed = 0.0;
    for _ in 0..8 {
        velocity = step(&mut controller, &mut motor, velocity, DT);
        let speed = velocity.length();
        assert!(speed > previous_speed, "{speed} should exceed {previous_speed}");
        assert!(speed < 10.0);
        previous_speed = speed;
    }
    assert!(previous_speed > 9.99);
    assert!(velocity.x > 0.0);

    let ratio = controller.animator().last_float(AnimParam::Velocity).unwrap();
    assert!((ratio - previous_speed / 10.0).abs() < 1e-5);
    assert_eq!(controller.animator().last_bool(AnimParam::OnAir), Some(false));
}

#[test]
fn test_airborne_gravity_and_drag() {
    let mut controller = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::airborne();

    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);

    let expected = Vec3::new(0.0, -3.0, 0.0) / 1.01;
    assert!((velocity - expected).length() < 1e-5);
    assert_eq!(controller.animator().last_bool(AnimParam::OnAir), Some(true));
}

#[test]
fn test_air_control_cannot_climb_unstable_slope() {
    let tuning = MotionTuning {
        gravity: Vec3::ZERO,
        drag: 0.0,
        ..default()
    };
    let mut controller = controller(tuning);
    // Slope facing +X, too steep to stand on.
    let slope_normal = Vec3::new(1.0, 1.0, 0.0).normalize();
    let mut motor = ScriptedMotor::new(GroundingReport::sliding(slope_normal));
    controller.set_inputs(
        &mut motor,
        &InputSnapshot {
            move_axis_right: -1.0,
            ..default()
        },
    );

    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!(velocity.x.abs() < 1e-5, "pushing into the slope adds no speed");
}

// ============================================================================
// Jumping
// ============================================================================

#[test]
fn test_jump_consumed_once_per_grounded_interval() {
    let mut controller = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::grounded();

    controller.set_inputs(&mut motor, &jump_press());
    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);

    let jump = controller.jump_state().unwrap();
    assert!(jump.consumed);
    assert!(jump.jumped_this_frame);
    assert!((velocity.y - 10.0).abs() < 1e-5);
    assert_eq!(motor.unground_requests, vec![0.1]);

    motor.set_grounding(GroundingReport::airborne());
    controller.set_inputs(&mut motor, &jump_press());
    let second = step(&mut controller, &mut motor, velocity, DT);

    let jump = controller.jump_state().unwrap();
    assert!(!jump.jumped_this_frame);
    assert!(second.y < velocity.y, "no upward velocity from a second press");
    assert!((second.y - 7.0 / 1.01).abs() < 1e-4);
    assert_eq!(motor.unground_requests.len(), 1);
}

#[test]
fn test_jump_trigger_and_aim_forwarded() {
    let mut controller = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::grounded();
    controller.set_inputs(
        &mut motor,
        &InputSnapshot {
            jump_down: true,
            aiming: true,
            ..default()
        },
    );

    assert!(controller.animator().triggers().any(|t| t == AnimTrigger::Jump));
    assert_eq!(controller.animator().last_bool(AnimParam::OnAiming), Some(true));
}

#[test]
fn test_double_jump_requires_consumed_base_jump() {
    let tuning = MotionTuning {
        allow_double_jump: true,
        ..default()
    };
    let mut controller = controller(tuning);
    let mut motor = ScriptedMotor::airborne();

    // Never jumped: an air press does nothing.
    controller.set_inputs(&mut motor, &jump_press());
    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!(velocity.y < 0.0);
    assert!(!controller.jump_state().unwrap().double_jump_consumed);

    // Land, jump, then double jump in the air.
    motor.set_grounding(GroundingReport::stable(Vec3::Y));
    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);
    controller.set_inputs(&mut motor, &jump_press());
    let velocity = step(&mut controller, &mut motor, velocity, DT);
    assert!(controller.jump_state().unwrap().consumed);

    motor.set_grounding(GroundingReport::airborne());
    let velocity = step(&mut controller, &mut motor, velocity, DT);
    controller.set_inputs(&mut motor, &jump_press());
    let velocity = step(&mut controller, &mut motor, velocity, DT);
    let jump = controller.jump_state().unwrap();
    assert!(jump.double_jump_consumed);
    assert!(jump.jumped_this_frame);
    assert!((velocity.y - 10.0).abs() < 1e-4);

    // Third press: nothing left.
    controller.set_inputs(&mut motor, &jump_press());
    let after = step(&mut controller, &mut motor, velocity, DT);
    assert!(after.y < velocity.y);

    // Regaining stable ground restores both jumps.
    motor.set_grounding(GroundingReport::stable(Vec3::Y));
    step(&mut controller, &mut motor, Vec3::ZERO, DT);
    let jump = controller.jump_state().unwrap();
    assert!(!jump.consumed);
    assert!(!jump.double_jump_consumed);
}

#[test]
fn test_pre_grounding_grace_buffers_press() {
    let tuning = MotionTuning {
        jump_pre_grounding_grace_time: 0.25,
        ..default()
    };
    let mut controller = controller(tuning);
    let mut motor = ScriptedMotor::airborne();

    controller.set_inputs(&mut motor, &jump_press());
    step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!(controller.jump_state().unwrap().requested);

    motor.set_grounding(GroundingReport::stable(Vec3::Y));
    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!((velocity.y - 10.0).abs() < 1e-5);
}

#[test]
fn test_press_expires_without_grace() {
    let mut controller = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::airborne();

    controller.set_inputs(&mut motor, &jump_press());
    step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!(!controller.jump_state().unwrap().requested);

    motor.set_grounding(GroundingReport::stable(Vec3::Y));
    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!(velocity.y.abs() < 1e-5);
}

#[test]
fn test_post_grounding_grace_allows_late_jump() {
    let tuning = MotionTuning {
        jump_post_grounding_grace_time: 0.15,
        ..default()
    };
    let mut controller = controller(tuning.clone());
    let mut motor = ScriptedMotor::grounded();
    step(&mut controller, &mut motor, Vec3::ZERO, DT);

    motor.set_grounding(GroundingReport::airborne());
    step(&mut controller, &mut motor, Vec3::ZERO, DT);

    controller.set_inputs(&mut motor, &jump_press());
    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!((velocity.y - 10.0).abs() < 1e-5);

    // Same timeline without grace: no jump.
    let mut controller = self::controller(MotionTuning::default());
    let mut motor = ScriptedMotor::grounded();
    step(&mut controller, &mut motor, Vec3::ZERO, DT);
    motor.set_grounding(GroundingReport::airborne());
    step(&mut controller, &mut motor, Vec3::ZERO, DT);
    controller.set_inputs(&mut motor, &jump_press());
    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!(velocity.y < 0.0);
}

#[test]
fn test_sliding_jump_follows_ground_normal() {
    let tuning = MotionTuning {
        allow_jumping_when_sliding: true,
        gravity: Vec3::ZERO,
        drag: 0.0,
        ..default()
    };
    let mut controller = controller(tuning);
    let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
    let mut motor = ScriptedMotor::new(GroundingReport::sliding(normal));

    controller.set_inputs(&mut motor, &jump_press());
    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!((velocity - normal * 10.0).length() < 1e-4);
}

#[test]
fn test_wall_jump_uses_captured_normal_once() {
    let tuning = MotionTuning {
        allow_wall_jump: true,
        ..default()
    };
    let mut controller = controller(tuning);
    let mut motor = ScriptedMotor::airborne();

    let (hit, mut report) = unstable_hit(Vec3::X);
    controller.on_movement_hit(&mut motor, &hit, &mut report);
    assert!(controller.jump_state().unwrap().wall_jump_normal.is_some());

    controller.set_inputs(&mut motor, &jump_press());
    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!((velocity.x - 10.0).abs() < 1e-4);
    assert!(velocity.y.abs() < 1e-4);
    assert!(controller.jump_state().unwrap().wall_jump_normal.is_none());
}

#[test]
fn test_wall_capture_dropped_without_press() {
    let tuning = MotionTuning {
        allow_wall_jump: true,
        ..default()
    };
    let mut controller = controller(tuning);
    let mut motor = ScriptedMotor::airborne();

    let (hit, mut report) = unstable_hit(Vec3::X);
    controller.on_movement_hit(&mut motor, &hit, &mut report);
    assert!(controller.jump_state().unwrap().wall_jump_normal.is_some());

    step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!(controller.jump_state().unwrap().wall_jump_normal.is_none());

    // A press on the following step finds no wall to jump from.
    controller.set_inputs(&mut motor, &jump_press());
    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!(velocity.x.abs() < 1e-4);
    assert!(velocity.y < 0.0);
    assert!(!controller.jump_state().unwrap().consumed);
}

#[test]
fn test_wall_jump_ignored_on_stable_ground() {
    let tuning = MotionTuning {
        allow_wall_jump: true,
        ..default()
    };
    let mut controller = controller(tuning);
    let mut motor = ScriptedMotor::grounded();

    let (hit, mut report) = unstable_hit(Vec3::X);
    controller.on_movement_hit(&mut motor, &hit, &mut report);
    assert!(controller.jump_state().unwrap().wall_jump_normal.is_none());
}

#[test]
fn test_external_velocity_applied_once() {
    let tuning = MotionTuning {
        gravity: Vec3::ZERO,
        drag: 0.0,
        ..default()
    };
    let mut controller = controller(tuning);
    let mut motor = ScriptedMotor::airborne();

    controller.add_velocity(Vec3::new(2.0, 0.0, 0.0));
    controller.add_velocity(Vec3::new(3.0, 0.0, 0.0));
    let velocity = step(&mut controller, &mut motor, Vec3::ZERO, DT);
    assert!((velocity - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);

    let velocity = step(&mut controller, &mut motor, velocity, DT);
    assert!((velocity - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
}

// ============================================================================
// Rolling
// ============================================================================

#[test]
fn test_roll_auto_exits_after_charge_and_dwell() {
    let mut starter = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::grounded();
    starter.set_inputs(
        &mut motor,
        &InputSnapshot {
            roll_down: true,
            ..default()
        },
    );
    assert_eq!(starter.mode_kind(), MotionModeKind::Rolling);
    assert!(starter.animator().triggers().any(|t| t == AnimTrigger::Roll));
    let charge_velocity = starter.roll_state().unwrap().charge_velocity;
    assert!((charge_velocity - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-5);

    for (max_roll_time, stopped_time) in [(1.5, 0.0), (0.5, 0.2), (1.09, 0.49), (0.3, 0.45)] {
        let tuning = MotionTuning {
            max_roll_time,
            stopped_time,
            ..default()
        };
        let mut controller = controller(tuning);
        let mut motor = ScriptedMotor::grounded();
        controller.transition_to(&mut motor, MotionModeKind::Rolling);

        let mut velocity = Vec3::ZERO;
        let mut steps = 0;
        while controller.mode_kind() == MotionModeKind::Rolling {
            velocity = step(&mut controller, &mut motor, velocity, DT);
            steps += 1;
            assert!(steps < 100, "roll never ended");
        }

        let elapsed = steps as f32 * DT;
        let expected = max_roll_time + stopped_time;
        assert!(
            elapsed - expected > -1e-3 && elapsed - expected <= DT + 1e-3,
            "T={max_roll_time} S={stopped_time} exited at {elapsed}"
        );
    }
}

#[test]
fn test_roll_charge_keeps_vertical_velocity() {
    let tuning = MotionTuning {
        gravity: Vec3::new(0.0, -30.0, 0.0),
        ..default()
    };
    let mut controller = controller(tuning);
    let mut motor = ScriptedMotor::airborne();
    controller.transition_to(&mut motor, MotionModeKind::Rolling);

    controller.before_character_update(&mut motor, DT);
    let velocity = controller.update_velocity(&mut motor, Vec3::new(3.0, -2.0, 4.0), DT);
    assert!((velocity - Vec3::new(0.0, -5.0, -10.0)).length() < 1e-5);
}

#[test]
fn test_roll_stopped_by_head_on_obstruction() {
    let mut controller = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::grounded();
    controller.transition_to(&mut motor, MotionModeKind::Rolling);

    // Glancing and stable hits do not stop the charge.
    let (hit, mut report) = unstable_hit(Vec3::X);
    controller.on_movement_hit(&mut motor, &hit, &mut report);
    let mut stable = HitStabilityReport { is_stable: true };
    controller.on_movement_hit(&mut motor, &SurfaceHit { normal: Vec3::Z, ..hit }, &mut stable);
    assert!(!controller.roll_state().unwrap().stopped);

    let (hit, mut report) = unstable_hit(Vec3::Z);
    controller.on_movement_hit(&mut motor, &hit, &mut report);
    assert!(controller.roll_state().unwrap().stopped);

    let velocity = controller.update_velocity(&mut motor, Vec3::new(0.0, 0.0, -10.0), DT);
    assert_eq!(velocity, Vec3::ZERO);
    assert!(!controller.roll_state().unwrap().must_stop_velocity);

    // After the one-shot stop only gravity acts.
    let velocity = controller.update_velocity(&mut motor, velocity, DT);
    assert!((velocity - Vec3::new(0.0, -3.0, 0.0)).length() < 1e-5);
}

#[test]
fn test_roll_leaves_rotation_alone_and_ignores_impulses() {
    let mut controller = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::grounded();
    controller.transition_to(&mut motor, MotionModeKind::Rolling);

    let tilted = Quat::from_rotation_z(0.3);
    assert_eq!(controller.update_rotation(&motor, tilted, DT), tilted);

    controller.add_velocity(Vec3::X * 50.0);
    controller.transition_to(&mut motor, MotionModeKind::Default);
    assert_eq!(controller.default_state().unwrap().pending_velocity, Vec3::ZERO);
}

// ============================================================================
// NoClip and transitions
// ============================================================================

#[test]
fn test_noclip_toggle_runs_side_effects_once() {
    let mut controller = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::grounded();
    let toggle = InputSnapshot {
        noclip_down: true,
        ..default()
    };

    controller.set_inputs(&mut motor, &toggle);
    assert_eq!(controller.mode_kind(), MotionModeKind::NoClip);
    controller.set_inputs(&mut motor, &toggle);
    assert_eq!(controller.mode_kind(), MotionModeKind::Default);

    for solver in CollisionSolver::ALL {
        assert_eq!(motor.solver_count(solver, false), 1);
        assert_eq!(motor.solver_count(solver, true), 1);
    }
    assert_eq!(motor.solver_calls.len(), 6);
    assert!(motor.solver_calls[..3].iter().all(|(_, active)| !active));
}

#[test]
fn test_noclip_and_roll_edges_respect_current_mode() {
    let mut controller = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::grounded();

    controller.set_inputs(
        &mut motor,
        &InputSnapshot {
            roll_down: true,
            ..default()
        },
    );
    controller.set_inputs(
        &mut motor,
        &InputSnapshot {
            noclip_down: true,
            ..default()
        },
    );
    assert_eq!(controller.mode_kind(), MotionModeKind::Rolling);
    assert!(motor.solver_calls.is_empty());

    controller.transition_to(&mut motor, MotionModeKind::NoClip);
    controller.set_inputs(
        &mut motor,
        &InputSnapshot {
            roll_down: true,
            ..default()
        },
    );
    assert_eq!(controller.mode_kind(), MotionModeKind::NoClip);
}

#[test]
fn test_noclip_flies_with_camera_and_jump() {
    let tuning = MotionTuning {
        noclip_sharpness: 1.0e4,
        ..default()
    };
    let mut controller = controller(tuning);
    let mut motor = ScriptedMotor::grounded();
    controller.transition_to(&mut motor, MotionModeKind::NoClip);

    controller.set_inputs(
        &mut motor,
        &InputSnapshot {
            jump_held: true,
            ..default()
        },
    );
    let velocity = controller.update_velocity(&mut motor, Vec3::ZERO, DT);
    assert!((velocity - Vec3::Y * 10.0).length() < 1e-3);

    // Camera pitched down 45 degrees: forward input dives.
    controller.set_inputs(
        &mut motor,
        &InputSnapshot {
            move_axis_forward: 1.0,
            camera_rotation: Quat::from_rotation_x(-FRAC_PI_2 / 2.0),
            ..default()
        },
    );
    let velocity = controller.update_velocity(&mut motor, Vec3::ZERO, DT);
    assert!(velocity.y < -1.0);
    assert!(velocity.z < -1.0);
    assert!((velocity.length() - 10.0).abs() < 1e-2);

    // No input: target is zero, not NaN.
    controller.set_inputs(&mut motor, &InputSnapshot::default());
    let velocity = controller.update_velocity(&mut motor, Vec3::ONE, DT);
    assert!(velocity.is_finite());
    assert!(velocity.length() < 1e-3);
}

#[test]
fn test_stick_drift_has_no_direction() {
    let drift = InputSnapshot {
        move_axis_right: 1e-7,
        ..default()
    };

    let tuning = MotionTuning {
        noclip_sharpness: 1.0e4,
        ..default()
    };
    let mut flying = controller(tuning);
    let mut motor = ScriptedMotor::grounded();
    flying.transition_to(&mut motor, MotionModeKind::NoClip);
    flying.set_inputs(&mut motor, &drift);
    assert_eq!(flying.look_input(), Vec3::ZERO);
    let velocity = flying.update_velocity(&mut motor, Vec3::ZERO, DT);
    assert!(velocity.length() < 1e-4, "drift flew at {velocity:?}");

    let mut walking = controller(MotionTuning::default());
    walking.set_inputs(&mut motor, &drift);
    assert_eq!(walking.look_input(), Vec3::ZERO);
    let rotation = walking.update_rotation(&motor, Quat::IDENTITY, 100.0);
    assert!(rotation.angle_between(Quat::IDENTITY) < 1e-4);
}

// ============================================================================
// Rotation and input resolution
// ============================================================================

#[test]
fn test_rotation_turns_towards_movement() {
    let mut controller = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::grounded();
    controller.set_inputs(
        &mut motor,
        &InputSnapshot {
            move_axis_right: 1.0,
            ..default()
        },
    );

    let partial = controller.update_rotation(&motor, Quat::IDENTITY, DT);
    let facing = partial * Vec3::NEG_Z;
    assert!(facing.x > 0.0 && facing.z < 0.0, "partially turned: {facing:?}");

    let settled = controller.update_rotation(&motor, Quat::IDENTITY, 100.0);
    assert!((settled * Vec3::NEG_Z - Vec3::X).length() < 1e-4);
}

#[test]
fn test_rotation_towards_camera_and_idle() {
    let tuning = MotionTuning {
        orientation_method: OrientationMethod::TowardsCamera,
        ..default()
    };
    let mut controller = controller(tuning);
    let mut motor = ScriptedMotor::grounded();
    controller.set_inputs(
        &mut motor,
        &InputSnapshot {
            camera_rotation: Quat::from_rotation_y(FRAC_PI_2),
            ..default()
        },
    );
    let rotation = controller.update_rotation(&motor, Quat::IDENTITY, 100.0);
    assert!((rotation * Vec3::NEG_Z - Vec3::NEG_X).length() < 1e-4);

    let mut idle = self::controller(MotionTuning::default());
    idle.set_inputs(&mut motor, &InputSnapshot::default());
    assert_eq!(idle.look_input(), Vec3::ZERO);
    let rotation = idle.update_rotation(&motor, Quat::IDENTITY, DT);
    assert!(rotation.angle_between(Quat::IDENTITY) < 1e-4);
}

#[test]
fn test_rotation_aligns_up_with_gravity() {
    let tuning = MotionTuning {
        gravity: Vec3::new(0.0, 0.0, -30.0),
        ..default()
    };
    let mut controller = controller(tuning);
    let motor = ScriptedMotor::grounded();

    let rotation = controller.update_rotation(&motor, Quat::IDENTITY, DT);
    assert!((rotation * Vec3::Y - Vec3::Z).length() < 1e-4);
}

#[test]
fn test_camera_planar_frame_falls_back_when_looking_down() {
    let frame = CameraPlanarFrame::resolve(Quat::from_rotation_x(-FRAC_PI_2), Vec3::Y);
    assert!(frame.direction.is_finite());
    assert!((frame.direction - Vec3::NEG_Z).length() < 1e-4);

    let level = CameraPlanarFrame::resolve(Quat::IDENTITY, Vec3::Y);
    assert!((level.direction - Vec3::NEG_Z).length() < 1e-5);
}

#[test]
fn test_move_axes_clamped_to_unit_length() {
    let input = InputSnapshot {
        move_axis_forward: 1.0,
        move_axis_right: 1.0,
        ..default()
    };
    assert!((input.clamped_move_axes().length() - 1.0).abs() < 1e-5);
}

// ============================================================================
// Grounding events and collider filtering
// ============================================================================

#[test]
fn test_landing_and_leaving_ground_triggers() {
    let mut controller = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::airborne();

    motor.set_grounding(GroundingReport::stable(Vec3::Y));
    controller.post_grounding_update(&mut motor, DT);
    motor.set_grounding(GroundingReport::stable(Vec3::Y));
    controller.post_grounding_update(&mut motor, DT);
    motor.set_grounding(GroundingReport::airborne());
    controller.post_grounding_update(&mut motor, DT);

    let triggers: Vec<_> = controller.animator().triggers().collect();
    assert_eq!(
        triggers,
        vec![AnimTrigger::Landed, AnimTrigger::LeaveStableGround]
    );
}

#[test]
fn test_ignored_colliders_are_invalid() {
    let tuning = MotionTuning {
        ignored_colliders: vec![ColliderId(7)],
        ..default()
    };
    let controller = controller(tuning);
    assert!(!controller.is_collider_valid_for_collisions(ColliderId(7)));
    assert!(controller.is_collider_valid_for_collisions(ColliderId(8)));
}

#[test]
fn test_undrained_recorder_keeps_newest_cues() {
    let mut controller = controller(MotionTuning::default());
    let mut motor = ScriptedMotor::grounded();

    for _ in 0..MAX_BUFFERED_CUES {
        step(&mut controller, &mut motor, Vec3::ZERO, DT);
    }
    controller.animator_mut().set_trigger(AnimTrigger::Landed);

    let recorder = controller.animator();
    assert_eq!(recorder.cues.len(), MAX_BUFFERED_CUES);
    assert_eq!(
        recorder.cues.last(),
        Some(&AnimationCue::Trigger(AnimTrigger::Landed))
    );

    let drained = controller.animator_mut().drain().count();
    assert_eq!(drained, MAX_BUFFERED_CUES);
    assert!(controller.animator().cues.is_empty());
}
