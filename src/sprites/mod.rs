//! Sprites module: clip playback and sprite facing.

pub mod animation;


use bevy::prelude::*;

pub use animation::{AnimationController, ClipFinished, ClipLibrary, ClipPlayer, advance_clips};

use crate::content::SettingsHandle;
use crate::movement::Facing;

pub struct SpritesPlugin;

impl Plugin for SpritesPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ClipFinished>()
            .add_systems(
                FixedUpdate,
                advance_clips.before(crate::arbitration::AbilityTickSet),
            )
            .add_systems(Update, (sync_sprite_facing, refresh_clip_libraries));
    }
}

/// Mirror sprites to match their facing.
fn sync_sprite_facing(mut query: Query<(&Facing, &mut Sprite), Changed<Facing>>) {
    for (facing, mut sprite) in &mut query {
        sprite.flip_x = *facing == Facing::Left;
    }
}

/// Pick up clip changes after the tuning files are reloaded.
fn refresh_clip_libraries(
    handle: Res<SettingsHandle>,
    mut seen: Local<u64>,
    mut query: Query<&mut AnimationController>,
) {
    let generation = handle.generation();
    if generation == *seen {
        return;
    }
    *seen = generation;
    let library = ClipLibrary::from_defs(&handle.current().clips);
    for mut controller in &mut query {
        controller.set_library(library.clone());
    }
}
