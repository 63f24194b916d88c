//! Movement domain: the test level and debug-only respawn.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::interaction::{InteractableId, Ladder, PushBox};
use crate::movement::{GameLayer, Ground, Wall};

pub(crate) fn spawn_test_level(mut commands: Commands) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let platform_color = Color::srgb(0.5, 0.4, 0.3);

    let ground_layers = CollisionLayers::new(
        GameLayer::Ground,
        [GameLayer::Player, GameLayer::Interactable],
    );
    let wall_layers = CollisionLayers::new(
        GameLayer::Wall,
        [GameLayer::Player, GameLayer::Interactable],
    );

    let solids = [
        (Vec2::new(0.0, -200.0), Vec2::new(800.0, 40.0), true),
        (Vec2::new(-420.0, 50.0), Vec2::new(40.0, 500.0), false),
        (Vec2::new(420.0, 50.0), Vec2::new(40.0, 500.0), false),
        // Ledge reached by the ladder; walking off it triggers the cliff fall.
        (Vec2::new(250.0, 40.0), Vec2::new(200.0, 20.0), true),
    ];
    for (position, size, is_ground) in solids {
        let mut entity = commands.spawn((
            Sprite {
                color: if is_ground { ground_color } else { wall_color },
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(position.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
        ));
        if is_ground {
            entity.insert((Ground, ground_layers));
        } else {
            entity.insert((Wall, wall_layers));
        }
    }

    let sensor_layers = CollisionLayers::new(GameLayer::Interactable, [GameLayer::Player]);

    // Ladder from the floor up to the ledge.
    let ladder_size = Vec2::new(28.0, 230.0);
    let ladder_center = Vec2::new(165.0, -180.0 + ladder_size.y / 2.0);
    let ladder_id = InteractableId(1);
    commands.spawn((
        Ladder::new(
            ladder_id,
            Rect::from_center_size(ladder_center, ladder_size),
        ),
        ladder_id,
        Sprite {
            color: Color::srgb(0.6, 0.45, 0.2),
            custom_size: Some(ladder_size),
            ..default()
        },
        Transform::from_translation(ladder_center.extend(-1.0)),
        RigidBody::Static,
        Collider::rectangle(ladder_size.x, ladder_size.y),
        Sensor,
        sensor_layers,
    ));

    // A box that can be pushed along the floor.
    let box_size = Vec2::new(40.0, 40.0);
    let box_id = InteractableId(2);
    commands.spawn((
        PushBox::new(box_id, box_size / 2.0),
        box_id,
        Sprite {
            color: platform_color,
            custom_size: Some(box_size),
            ..default()
        },
        Transform::from_xyz(-80.0, -180.0 + box_size.y / 2.0, 0.0),
        RigidBody::Kinematic,
        Collider::rectangle(box_size.x, box_size.y),
        Sensor,
        LinearVelocity::default(),
        CollisionLayers::new(
            GameLayer::Interactable,
            [GameLayer::Player, GameLayer::Ground, GameLayer::Wall],
        ),
    ));
}

/// Press R to bring the player back to its spawn point.
#[cfg(feature = "dev-tools")]
pub(crate) fn respawn_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<
        (
            &crate::movement::SpawnPoint,
            &mut Transform,
            &mut LinearVelocity,
            &mut crate::core::CharacterStatus,
        ),
        With<crate::movement::Player>,
    >,
) {
    if !keyboard.just_pressed(KeyCode::KeyR) {
        return;
    }
    for (spawn, mut transform, mut velocity, mut status) in &mut query {
        transform.translation = spawn.0.extend(transform.translation.z);
        velocity.0 = Vec2::ZERO;
        status.revive();
        info!("Player respawned at {:?}", spawn.0);
    }
}
