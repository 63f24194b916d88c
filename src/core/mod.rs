//! Core domain: status tag, shared messages and the playable area.

pub mod events;
pub mod status;

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

pub use events::*;
pub use status::*;

use crate::movement::Player;

/// Anything whose centre falls below `kill_y` has left the level.
#[derive(Resource, Debug, Clone)]
pub struct PlayableArea {
    pub kill_y: f32,
}

impl Default for PlayableArea {
    fn default() -> Self {
        Self { kill_y: -1200.0 }
    }
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayableArea>()
            .add_message::<LeftPlayableArea>()
            .add_message::<InteractionEnded>()
            .add_message::<AffectTriggered>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                FixedUpdate,
                detect_left_playable_area.before(crate::arbitration::AbilityTickSet),
            );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub(crate) fn detect_left_playable_area(
    area: Res<PlayableArea>,
    query: Query<(Entity, &Transform, &CharacterStatus), With<Player>>,
    mut left: MessageWriter<LeftPlayableArea>,
) {
    for (entity, transform, status) in &query {
        if !status.is_dead() && transform.translation.y < area.kill_y {
            info!("Character {:?} left the playable area", entity);
            left.write(LeftPlayableArea { entity });
        }
    }
}
