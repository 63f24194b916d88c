//! Interaction domain: tracking which candidates are in range.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use super::candidate::{Interactable, InteractableId, InteractionActor};

/// Candidates currently overlapping the character, in arrival order.
#[derive(Component, Debug, Default, Clone)]
pub struct InteractionScanner {
    candidates: Vec<InteractableId>,
}

impl InteractionScanner {
    pub fn enter(&mut self, id: InteractableId) {
        if !self.candidates.contains(&id) {
            self.candidates.push(id);
        }
    }

    pub fn exit(&mut self, id: InteractableId) {
        self.candidates.retain(|c| *c != id);
    }

    pub fn contains(&self, id: InteractableId) -> bool {
        self.candidates.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = InteractableId> + '_ {
        self.candidates.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Available candidate with the lowest priority value. Ties keep the first.
pub fn select_best<'a, C: Interactable>(
    candidates: &'a [C],
    actor: &dyn InteractionActor,
) -> Option<&'a C> {
    candidates
        .iter()
        .filter(|c| c.is_available(actor))
        .fold(None, |best: Option<&C>, c| match best {
            Some(b) if b.priority() <= c.priority() => Some(b),
            _ => Some(c),
        })
}

/// Keep scanners in sync with sensor overlaps.
pub(crate) fn track_candidates(
    mut started: MessageReader<CollisionStart>,
    mut ended: MessageReader<CollisionEnd>,
    mut scanners: Query<&mut InteractionScanner>,
    ids: Query<&InteractableId>,
) {
    for event in started.read() {
        for (a, b) in [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ] {
            if let (Ok(mut scanner), Ok(id)) = (scanners.get_mut(a), ids.get(b)) {
                scanner.enter(*id);
                debug!("Candidate {:?} in range", id);
            }
        }
    }

    for event in ended.read() {
        for (a, b) in [
            (event.collider1, event.collider2),
            (event.collider2, event.collider1),
        ] {
            if let (Ok(mut scanner), Ok(id)) = (scanners.get_mut(a), ids.get(b)) {
                scanner.exit(*id);
                debug!("Candidate {:?} out of range", id);
            }
        }
    }
}
