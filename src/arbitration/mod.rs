//! Arbitration domain: one coordinator per character owns the five abilities,
//! resolves conflicting requests and drives them on the fixed tick.

mod bridge;
pub mod coordinator;


use bevy::prelude::*;

pub use coordinator::{AbilityCoordinator, AbilitySet, RequestDenied, TickEnv};

/// Fixed-tick systems that advance abilities. Clip playback and the
/// playable-area check run before it so their messages land the same tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbilityTickSet;

pub struct ArbitrationPlugin;

impl Plugin for ArbitrationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                bridge::check_capabilities,
                bridge::tick_abilities,
                bridge::sync_locomotion_clip,
            )
                .chain()
                .in_set(AbilityTickSet),
        )
        .add_systems(Update, bridge::sync_world_gravity);
    }
}
