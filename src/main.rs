use bevy::prelude::*;

use kinematic_player::sim::{MotionPlugin, Player};

/// Camera offset from the player, in world space.
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 4.0, 9.0);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Kinematic Player".to_string(),
                resolution: (1280, 720).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .add_plugins(MotionPlugin)
        .add_systems(Startup, spawn_scene)
        .add_systems(Update, (dress_player, follow_player))
        .run();
}

fn spawn_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(200.0, 200.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.35, 0.3))),
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(CAMERA_OFFSET).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Give freshly spawned players a visible body. The capsule's feet sit at the
/// motor position.
fn dress_player(
    mut commands: Commands,
    players: Query<Entity, Added<Player>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for entity in &players {
        let body = commands
            .spawn((
                Mesh3d(meshes.add(Capsule3d::new(0.4, 1.0))),
                MeshMaterial3d(materials.add(Color::srgb(0.9, 0.9, 0.9))),
                Transform::from_xyz(0.0, 0.9, 0.0),
            ))
            .id();
        commands
            .entity(entity)
            .insert(Visibility::default())
            .add_child(body);
    }
}

fn follow_player(
    players: Query<&Transform, (With<Player>, Without<Camera3d>)>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
) {
    let Some(player) = players.iter().next() else {
        return;
    };
    for mut camera in &mut cameras {
        camera.translation = player.translation + CAMERA_OFFSET;
        camera.look_at(player.translation + Vec3::Y, Vec3::Y);
    }
}
