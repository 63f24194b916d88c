//! Movement domain: the rigid body surface abilities drive.

use bevy::prelude::*;

use crate::interaction::InteractableId;

/// Simulation mode of the character body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyMode {
    /// Gravity and collisions apply.
    #[default]
    Dynamic,
    /// Moved only by explicit position writes.
    Kinematic,
}

/// Read/write access to a character's rigid body.
pub trait CharacterBody {
    fn position(&self) -> Vec2;
    /// Teleport the body. Used for scripted displacement.
    fn move_position(&mut self, position: Vec2);
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    fn gravity_scale(&self) -> f32;
    fn set_gravity_scale(&mut self, scale: f32);
    fn mode(&self) -> BodyMode;
    fn set_mode(&mut self, mode: BodyMode);
    /// Half size of the character's collider.
    fn half_extents(&self) -> Vec2;

    fn translate(&mut self, delta: Vec2) {
        let position = self.position();
        self.move_position(position + delta);
    }

    fn set_velocity_x(&mut self, x: f32) {
        let velocity = self.velocity();
        self.set_velocity(Vec2::new(x, velocity.y));
    }
}

/// Bodies of interactable objects the character can grip and move.
pub trait TargetBodies {
    fn position(&self, id: InteractableId) -> Option<Vec2>;
    fn move_position(&mut self, id: InteractableId, position: Vec2);
    fn bounds(&self, id: InteractableId) -> Option<Rect>;
    fn set_velocity_x(&mut self, id: InteractableId, x: f32);
    /// Switch the target between trigger and solid collision.
    fn set_solid(&mut self, id: InteractableId, solid: bool);
}
