//! Interaction domain: the candidate contract and the world objects that
//! implement it.

use bevy::prelude::*;

use crate::abilities::{LadderSpec, PushTargetSpec};

/// Stable id of an interactable object, independent of its entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractableId(pub u32);

pub const LADDER_PRIORITY: i32 = 100;
pub const PUSH_BOX_PRIORITY: i32 = 10;

/// The character side of an interaction.
pub trait InteractionActor {
    fn position(&self) -> Vec2;
    fn try_begin_climb(&mut self, ladder: &LadderSpec) -> bool;
    fn end_climb(&mut self, ladder: InteractableId);
    fn try_begin_push_pull(&mut self, target: &PushTargetSpec) -> bool;
    fn end_push_pull(&mut self, target: InteractableId);
}

/// A world object the character can engage with the interact button.
pub trait Interactable {
    fn id(&self) -> InteractableId;
    /// Lower values win when several candidates are in range.
    fn priority(&self) -> i32;
    fn is_available(&self, actor: &dyn InteractionActor) -> bool;
    fn begin_interact(&self, actor: &mut dyn InteractionActor) -> bool;
    fn end_interact(&self, actor: &mut dyn InteractionActor);
}

/// A climbable ladder.
#[derive(Component, Debug, Clone)]
pub struct Ladder {
    pub id: InteractableId,
    /// World-space climbable area.
    pub bounds: Rect,
    pub top_exit_snap: f32,
    pub bottom_exit_snap: f32,
    pub speed: f32,
    pub priority: i32,
    pub enabled: bool,
}

impl Ladder {
    pub fn new(id: InteractableId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            top_exit_snap: 0.2,
            bottom_exit_snap: 0.2,
            speed: 1.0,
            priority: LADDER_PRIORITY,
            enabled: true,
        }
    }

    pub fn spec(&self) -> LadderSpec {
        LadderSpec {
            id: self.id,
            bounds: self.bounds,
            top_exit_snap: self.top_exit_snap,
            bottom_exit_snap: self.bottom_exit_snap,
            speed: self.speed,
        }
    }
}

impl Interactable for Ladder {
    fn id(&self) -> InteractableId {
        self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn is_available(&self, _actor: &dyn InteractionActor) -> bool {
        self.enabled
    }

    fn begin_interact(&self, actor: &mut dyn InteractionActor) -> bool {
        actor.try_begin_climb(&self.spec())
    }

    fn end_interact(&self, actor: &mut dyn InteractionActor) {
        actor.end_climb(self.id);
    }
}

/// A box the character can grip and move horizontally.
#[derive(Component, Debug, Clone)]
pub struct PushBox {
    pub id: InteractableId,
    pub half_size: Vec2,
    pub can_push: bool,
    pub can_pull: bool,
    pub push_speed: Option<f32>,
    pub pull_speed: Option<f32>,
    pub priority: i32,
    pub enabled: bool,
}

impl PushBox {
    pub fn new(id: InteractableId, half_size: Vec2) -> Self {
        Self {
            id,
            half_size,
            can_push: true,
            can_pull: true,
            push_speed: None,
            pull_speed: None,
            priority: PUSH_BOX_PRIORITY,
            enabled: true,
        }
    }

    pub fn spec(&self) -> PushTargetSpec {
        PushTargetSpec {
            id: self.id,
            can_push: self.can_push,
            can_pull: self.can_pull,
            push_speed: self.push_speed,
            pull_speed: self.pull_speed,
        }
    }
}

impl Interactable for PushBox {
    fn id(&self) -> InteractableId {
        self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn is_available(&self, _actor: &dyn InteractionActor) -> bool {
        self.enabled
    }

    fn begin_interact(&self, actor: &mut dyn InteractionActor) -> bool {
        actor.try_begin_push_pull(&self.spec())
    }

    fn end_interact(&self, actor: &mut dyn InteractionActor) {
        actor.end_push_pull(self.id);
    }
}

/// Snapshot of an in-range candidate, detached from the ECS.
#[derive(Debug, Clone)]
pub enum Candidate {
    Ladder(Ladder),
    PushBox(PushBox),
}

impl Candidate {
    fn inner(&self) -> &dyn Interactable {
        match self {
            Candidate::Ladder(ladder) => ladder,
            Candidate::PushBox(push_box) => push_box,
        }
    }
}

impl Interactable for Candidate {
    fn id(&self) -> InteractableId {
        self.inner().id()
    }

    fn priority(&self) -> i32 {
        self.inner().priority()
    }

    fn is_available(&self, actor: &dyn InteractionActor) -> bool {
        self.inner().is_available(actor)
    }

    fn begin_interact(&self, actor: &mut dyn InteractionActor) -> bool {
        self.inner().begin_interact(actor)
    }

    fn end_interact(&self, actor: &mut dyn InteractionActor) {
        self.inner().end_interact(actor)
    }
}
