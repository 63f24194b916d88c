//! Movement domain: character body contracts, collision probes, locomotion
//! and input, plus player and level bootstrap.

mod body;
mod bootstrap;
mod components;
mod dev;
mod input;
mod locomotion;
mod probe;


pub use body::{BodyMode, CharacterBody, TargetBodies};
pub use components::{Facing, GameLayer, Ground, Player, SpawnPoint, Wall};
pub use input::ActionInput;
pub use locomotion::{INPUT_DEADZONE, LocomotionTuning, air_control, drive};
pub use probe::{CastHit, KinematicProbe};

use bevy::prelude::*;

use crate::movement::bootstrap::spawn_player;
use crate::movement::dev::spawn_test_level;
use crate::movement::input::read_input;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActionInput>()
            .add_systems(Startup, (spawn_test_level, spawn_player).chain())
            .add_systems(Update, read_input);

        #[cfg(feature = "dev-tools")]
        app.add_systems(Update, dev::respawn_player);
    }
}
