//! Sim domain: a minimal kinematic motor against one infinite ground plane.
//!
//! Good enough to drive the controller through its full callback order in
//! the demo, replays and integration tests. It is not a general resolver:
//! the only obstacle is the plane itself.

use bevy::prelude::*;

use crate::motion::math;
use crate::motion::{
    CharacterController, CharacterMotor, ColliderId, CollisionSolver, GroundingReport,
    HitStabilityReport, SurfaceHit,
};

/// Collider id the plane reports in its hits.
pub const GROUND_COLLIDER: ColliderId = ColliderId(0);

#[derive(Debug, Clone)]
pub struct PlaneMotor {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub ground_height: f32,
    pub ground_normal: Vec3,
    /// Steepest walkable slope, in degrees from up.
    pub max_stable_slope_angle: f32,
    /// How far below the feet ground is still detected.
    pub ground_probe_distance: f32,
    grounding: GroundingReport,
    last_grounding: GroundingReport,
    unground_timer: f32,
    capsule_collisions: bool,
    movement_collisions: bool,
    ground_solving: bool,
}

impl Default for PlaneMotor {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl PlaneMotor {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            ground_height: 0.0,
            ground_normal: Vec3::Y,
            max_stable_slope_angle: 60.0,
            ground_probe_distance: 0.05,
            grounding: GroundingReport::airborne(),
            last_grounding: GroundingReport::airborne(),
            unground_timer: 0.0,
            capsule_collisions: true,
            movement_collisions: true,
            ground_solving: true,
        }
    }

    pub fn with_ground_normal(mut self, normal: Vec3) -> Self {
        self.ground_normal = normal.normalize_or(Vec3::Y);
        self
    }

    pub fn is_solver_active(&self, solver: CollisionSolver) -> bool {
        match solver {
            CollisionSolver::Capsule => self.capsule_collisions,
            CollisionSolver::Movement => self.movement_collisions,
            CollisionSolver::Ground => self.ground_solving,
        }
    }

    /// Signed distance of `point` above the plane.
    fn height_above_ground(&self, point: Vec3) -> f32 {
        (point - Vec3::Y * self.ground_height).dot(self.ground_normal)
    }

    fn plane_is_stable(&self) -> bool {
        self.ground_normal.angle_between(Vec3::Y).to_degrees() <= self.max_stable_slope_angle
    }

    /// Run one physics step, calling `controller` in protocol order.
    pub fn simulate<C: CharacterController>(&mut self, controller: &mut C, dt: f32) {
        controller.before_character_update(self, dt);

        let rotation = self.rotation;
        self.rotation = controller.update_rotation(self, rotation, dt).normalize();
        let velocity = self.velocity;
        self.velocity = controller.update_velocity(self, velocity, dt);

        self.sweep(controller, dt);

        self.unground_timer = (self.unground_timer - dt).max(0.0);
        let ground_valid = controller.is_collider_valid_for_collisions(GROUND_COLLIDER);
        self.last_grounding = self.grounding;
        self.grounding = self.probe_ground(ground_valid);
        if self.grounding.is_stable_on_ground {
            self.snap_to_ground();
        }

        controller.after_character_update(self, dt);
        controller.post_grounding_update(self, dt);
    }

    fn sweep<C: CharacterController>(&mut self, controller: &mut C, dt: f32) {
        let target = self.position + self.velocity * dt;
        let collides = self.movement_collisions
            && controller.is_collider_valid_for_collisions(GROUND_COLLIDER);

        if !collides || self.height_above_ground(target) >= 0.0 {
            self.position = target;
            return;
        }

        let depth = self.height_above_ground(target);
        let hit = SurfaceHit {
            collider: GROUND_COLLIDER,
            normal: self.ground_normal,
            point: target - self.ground_normal * depth,
        };
        let mut report = HitStabilityReport {
            is_stable: self.plane_is_stable(),
        };
        controller.process_hit_stability_report(&hit, target, self.rotation, &mut report);

        self.position = target - self.ground_normal * depth;
        if self.velocity.dot(self.ground_normal) < 0.0 {
            self.velocity = math::project_on_plane(self.velocity, self.ground_normal);
        }

        if report.is_stable {
            controller.on_ground_hit(self, &hit, &mut report);
        } else {
            controller.on_movement_hit(self, &hit, &mut report);
        }
    }

    fn probe_ground(&self, ground_valid: bool) -> GroundingReport {
        if !ground_valid || !self.ground_solving || self.unground_timer > 0.0 {
            return GroundingReport::airborne();
        }
        let height = self.height_above_ground(self.position);
        if height > self.ground_probe_distance || height < -self.ground_probe_distance {
            return GroundingReport::airborne();
        }
        if self.plane_is_stable() {
            GroundingReport::stable(self.ground_normal)
        } else {
            GroundingReport::sliding(self.ground_normal)
        }
    }

    fn snap_to_ground(&mut self) {
        let height = self.height_above_ground(self.position);
        self.position -= self.ground_normal * height;
    }
}

impl CharacterMotor for PlaneMotor {
    fn character_up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    fn character_forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    fn grounding_status(&self) -> GroundingReport {
        self.grounding
    }

    fn last_grounding_status(&self) -> GroundingReport {
        self.last_grounding
    }

    fn force_unground(&mut self, duration: f32) {
        self.unground_timer = self.unground_timer.max(duration);
    }

    fn set_collision_solving(&mut self, solver: CollisionSolver, active: bool) {
        match solver {
            CollisionSolver::Capsule => self.capsule_collisions = active,
            CollisionSolver::Movement => self.movement_collisions = active,
            CollisionSolver::Ground => self.ground_solving = active,
        }
    }
}
