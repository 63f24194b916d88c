//! Movement domain: collision queries used by abilities.

use bevy::prelude::*;

use crate::interaction::InteractableId;

/// A sweep contact, `distance` along the swept direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastHit {
    pub distance: f32,
}

impl CastHit {
    pub fn new(distance: f32) -> Self {
        Self { distance }
    }
}

/// Read-only collision queries against the level.
pub trait KinematicProbe {
    /// Is the character standing on ground when centred at `position`?
    fn is_grounded(&self, position: Vec2) -> bool;

    /// Gap kept between a swept body and what it runs into, in world units.
    fn skin(&self) -> f32;

    /// Sweep the character's collider from `origin`, ignoring the character itself.
    fn cast_character(&self, origin: Vec2, direction: Vec2, distance: f32) -> Vec<CastHit>;

    /// Sweep a grippable target's collider from its current position.
    fn cast_target(&self, target: InteractableId, direction: Vec2, distance: f32) -> Vec<CastHit>;

    /// How far a body may move of the `wanted` distance before it touches
    /// something, keeping the skin gap.
    fn allowed_travel(&self, hits: &[CastHit], wanted: f32) -> f32 {
        match nearest_hit(hits) {
            Some(hit) => (hit.distance - self.skin()).clamp(0.0, wanted),
            None => wanted,
        }
    }
}

fn nearest_hit(hits: &[CastHit]) -> Option<&CastHit> {
    hits.iter().min_by(|a, b| a.distance.total_cmp(&b.distance))
}
