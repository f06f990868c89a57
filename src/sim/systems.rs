//! Sim domain: input sampling, fixed-step motion and cue forwarding.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::sim::{AnimationCueMessage, Player, PlayerInput, PlayerMotion};

/// Sample the keyboard and camera, then hand the snapshot straight to the
/// controller so edge inputs land before the next physics step.
pub(crate) fn read_input(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    cameras: Query<&Transform, (With<Camera3d>, Without<Player>)>,
    mut input: ResMut<PlayerInput>,
    mut players: Query<&mut PlayerMotion, With<Player>>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };

    let mut right = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        right -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        right += 1.0;
    }

    let mut forward = 0.0;
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        forward -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        forward += 1.0;
    }

    if keyboard.just_pressed(KeyCode::KeyF) {
        input.aiming = !input.aiming;
    }

    let snapshot = &mut input.snapshot;
    snapshot.move_axis_forward = forward;
    snapshot.move_axis_right = right;
    snapshot.camera_rotation = cameras
        .iter()
        .next()
        .map(|transform| transform.rotation)
        .unwrap_or(Quat::IDENTITY);
    snapshot.jump_down = keyboard.just_pressed(KeyCode::Space);
    snapshot.jump_held = keyboard.pressed(KeyCode::Space);
    snapshot.roll_down = keyboard.just_pressed(KeyCode::ShiftLeft);
    snapshot.noclip_down = noclip_pressed(&keyboard);
    let aiming = input.aiming;
    input.snapshot.aiming = aiming;

    for mut motion in &mut players {
        motion.apply_input(&input.snapshot);
    }
}

#[cfg(feature = "dev-tools")]
fn noclip_pressed(keyboard: &ButtonInput<KeyCode>) -> bool {
    keyboard.just_released(KeyCode::KeyG)
}

#[cfg(not(feature = "dev-tools"))]
fn noclip_pressed(_keyboard: &ButtonInput<KeyCode>) -> bool {
    false
}

pub(crate) fn step_player_motion(
    time: Res<Time>,
    mut players: Query<(&mut PlayerMotion, &mut Transform), With<Player>>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (mut motion, mut transform) in &mut players {
        motion.step(dt);
        transform.translation = motion.motor.position;
        transform.rotation = motion.motor.rotation;
    }
}

pub(crate) fn forward_animation_cues(
    mut players: Query<(Entity, &mut PlayerMotion), With<Player>>,
    mut cues: MessageWriter<AnimationCueMessage>,
) {
    for (entity, mut motion) in &mut players {
        for cue in motion.controller.animator_mut().drain() {
            cues.write(AnimationCueMessage { entity, cue });
        }
    }
}
