//! Core domain: messages published by the ability core.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::core::AbilityKind;
use crate::interaction::InteractableId;

/// Fired when a character falls below the playable area.
#[derive(Debug)]
pub struct LeftPlayableArea {
    pub entity: Entity,
}

impl Message for LeftPlayableArea {}

/// Fired when a climb or push/pull engagement with a candidate finishes.
#[derive(Debug)]
pub struct InteractionEnded {
    pub actor: Entity,
    pub candidate: InteractableId,
    pub ability: AbilityKind,
}

impl Message for InteractionEnded {}

/// Fired when an attack step starts its hit window.
#[derive(Debug)]
pub struct AffectTriggered {
    pub actor: Entity,
    pub affect_id: u32,
    pub duration: f32,
}

impl Message for AffectTriggered {}
