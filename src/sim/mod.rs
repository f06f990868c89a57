//! Sim domain: reference motor and Bevy wiring for the player controller.

mod plane_motor;
mod systems;


pub use plane_motor::{GROUND_COLLIDER, PlaneMotor};

use bevy::ecs::message::Message;
use bevy::prelude::*;
use std::path::Path;

use crate::motion::{AnimationCue, InputSnapshot, PlayerCharacterController};
use crate::sim::systems::{forward_animation_cues, read_input, step_player_motion};
use crate::tuning::{DEFAULT_TUNING_PATH, MotionTuning, load_tuning_or_default};

/// Spawn height of the player above the ground plane.
const SPAWN_HEIGHT: f32 = 2.0;

#[derive(Component, Debug)]
pub struct Player;

/// Controller plus the motor driving it, stepped together every fixed tick.
#[derive(Component, Debug)]
pub struct PlayerMotion {
    pub controller: PlayerCharacterController,
    pub motor: PlaneMotor,
}

impl PlayerMotion {
    pub fn new(tuning: MotionTuning, position: Vec3) -> Self {
        Self {
            controller: PlayerCharacterController::new(tuning),
            motor: PlaneMotor::new(position),
        }
    }

    pub fn apply_input(&mut self, input: &InputSnapshot) {
        self.controller.set_inputs(&mut self.motor, input);
    }

    pub fn step(&mut self, dt: f32) {
        self.motor.simulate(&mut self.controller, dt);
    }
}

/// Last snapshot handed to the controller.
#[derive(Resource, Debug, Default)]
pub struct PlayerInput {
    pub snapshot: InputSnapshot,
    /// Persistent aim toggle state.
    pub aiming: bool,
}

/// Animation write emitted by a player's controller.
#[derive(Debug, Clone, Copy)]
pub struct AnimationCueMessage {
    pub entity: Entity,
    pub cue: AnimationCue,
}

impl Message for AnimationCueMessage {}

pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(load_tuning_or_default(Path::new(DEFAULT_TUNING_PATH)))
            .init_resource::<PlayerInput>()
            .add_message::<AnimationCueMessage>()
            .add_systems(Startup, spawn_player)
            .add_systems(Update, read_input)
            .add_systems(FixedUpdate, (step_player_motion, forward_animation_cues).chain());
    }
}

fn spawn_player(mut commands: Commands, tuning: Res<MotionTuning>) {
    let position = Vec3::Y * SPAWN_HEIGHT;
    info!(
        "Spawning player: jump_height={:.2}, roll_distance={:.2}",
        tuning.single_jump_height(),
        tuning.roll_distance()
    );
    commands.spawn((
        Player,
        PlayerMotion::new(tuning.clone(), position),
        Transform::from_translation(position),
    ));
}
