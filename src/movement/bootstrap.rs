//! Movement domain: player bootstrap from the loaded content.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::arbitration::AbilityCoordinator;
use crate::content::SettingsHandle;
use crate::core::CharacterStatus;
use crate::interaction::InteractionScanner;
use crate::movement::{Facing, GameLayer, Player, SpawnPoint};
use crate::sprites::{AnimationController, ClipLibrary};

pub const PLAYER_SIZE: Vec2 = Vec2::new(24.0, 48.0);
const PLAYER_SPAWN: Vec2 = Vec2::new(-250.0, -150.0);

/// Spawn the player with its abilities wired to the shared settings.
pub(crate) fn spawn_player(
    mut commands: Commands,
    settings: Res<SettingsHandle>,
    existing_player: Query<Entity, With<Player>>,
) {
    if !existing_player.is_empty() {
        info!("Player already exists, skipping spawn");
        return;
    }

    let content = settings.current();
    let library = ClipLibrary::from_defs(&content.clips);
    info!(
        "Spawning player at {:?} with {} clips",
        PLAYER_SPAWN,
        library.len()
    );

    commands.spawn((
        // Identity & abilities
        (
            Player,
            CharacterStatus::default(),
            Facing::default(),
            SpawnPoint(PLAYER_SPAWN),
            AbilityCoordinator::new(&settings),
            AnimationController::new(library),
            InteractionScanner::default(),
        ),
        // Rendering
        Sprite {
            color: Color::srgb(0.9, 0.9, 0.9),
            custom_size: Some(PLAYER_SIZE),
            ..default()
        },
        Transform::from_translation(PLAYER_SPAWN.extend(0.0)),
        // Physics
        (
            RigidBody::Dynamic,
            Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(1.0),
            Friction::new(0.0),
            CollisionEventsEnabled,
            CollisionLayers::new(
                GameLayer::Player,
                [GameLayer::Ground, GameLayer::Wall, GameLayer::Interactable],
            ),
        ),
    ));
}
