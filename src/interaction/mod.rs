//! Interaction domain: ladders, boxes and the proximity scanner.

pub mod candidate;
pub mod scanner;


use bevy::prelude::*;

pub use candidate::*;
pub use scanner::*;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, track_candidates);
    }
}
