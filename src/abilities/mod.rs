//! Abilities domain: the five ability state machines and the primitives
//! they share.
//!
//! Every ability is a plain struct driven through an [`AbilityContext`], so
//! the state machines run identically against avian bodies and test doubles.

pub mod attack_combo;
pub mod climb;
pub mod dash;
pub mod easing;
pub mod jump;
pub mod physics_override;
pub mod push_pull;
pub mod watchdog;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy::prelude::*;

pub use attack_combo::{AttackComboAbility, AttackPhase};
pub use climb::{ClimbAbility, ClimbExit, ClimbPhase, LadderSpec};
pub use dash::{DashAbility, DashPhase};
pub use easing::DashCurve;
pub use jump::{JumpAbility, JumpPhase};
pub use physics_override::PhysicsOverride;
pub use push_pull::{GripSide, PushPullAbility, PushPullPhase, PushTargetSpec};
pub use watchdog::Watchdog;

use crate::core::{AbilityKind, CharacterStatus};
use crate::interaction::InteractableId;
use crate::movement::{CharacterBody, Facing, KinematicProbe, TargetBodies};
use crate::sprites::ClipPlayer;

/// Everything an ability may touch during one call.
pub struct AbilityContext<'a> {
    pub body: &'a mut dyn CharacterBody,
    pub probe: &'a dyn KinematicProbe,
    pub animator: &'a mut dyn ClipPlayer,
    pub targets: &'a mut dyn TargetBodies,
    pub status: &'a mut CharacterStatus,
    pub facing: &'a mut Facing,
    pub physics: &'a mut PhysicsOverride,
    pub events: &'a mut Vec<AbilityEvent>,
    /// Move axis for this tick.
    pub axis: Vec2,
    /// Simulation time in seconds.
    pub now: f32,
    pub dt: f32,
}

impl AbilityContext<'_> {
    pub fn is_grounded(&self) -> bool {
        self.probe.is_grounded(self.body.position())
    }

    /// Play `clip` if the character has it. Returns whether it played.
    pub fn play_if_present(&mut self, clip: &str) -> bool {
        if self.animator.has_clip(clip) {
            self.animator.play_clip(clip);
            true
        } else {
            false
        }
    }
}

/// Side effects published by abilities and drained by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum AbilityEvent {
    InteractionEnded {
        candidate: InteractableId,
        ability: AbilityKind,
    },
    AffectTriggered {
        affect_id: u32,
        duration: f32,
    },
}

/// Shared "is this ability running" flag, readable from other abilities.
#[derive(Debug, Clone, Default)]
pub struct ActivityFlag(Arc<AtomicBool>);

impl ActivityFlag {
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, active: bool) {
        self.0.store(active, Ordering::Release);
    }
}

/// Conditions abilities report through the log instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum AbilityFault {
    MissingCapability {
        ability: AbilityKind,
        capability: &'static str,
    },
    AnimationEventTimeout {
        ability: AbilityKind,
        phase: String,
    },
    InvalidTransition {
        ability: AbilityKind,
        status: CharacterStatus,
    },
}

impl std::fmt::Display for AbilityFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbilityFault::MissingCapability {
                ability,
                capability,
            } => write!(f, "{} disabled: missing {}", ability, capability),
            AbilityFault::AnimationEventTimeout { ability, phase } => {
                write!(f, "{} completion for {} never arrived", ability, phase)
            }
            AbilityFault::InvalidTransition { ability, status } => {
                write!(f, "{} cannot start while {:?}", ability, status)
            }
        }
    }
}

/// Behaviour common to every ability, used by the coordinator.
pub trait Ability {
    fn kind(&self) -> AbilityKind;
    fn is_active(&self) -> bool;
    /// Advance one fixed tick.
    fn update(&mut self, ctx: &mut AbilityContext);
    /// Stop immediately, or via the exit clip unless `skip_exit_clip`.
    fn cancel(&mut self, ctx: &mut AbilityContext, skip_exit_clip: bool, restore_physics: bool);
    /// Does the current phase wait for this clip to finish?
    fn awaits_clip(&self, clip: &str) -> bool;
    fn on_clip_finished(&mut self, ctx: &mut AbilityContext, clip: &str);
    /// Permanently disable after a missing capability.
    fn disable(&mut self, capability: &'static str);
}

/// Permanent disable switch with a single error log.
#[derive(Debug, Clone, Default)]
pub(crate) struct Capability {
    missing: Option<&'static str>,
}

impl Capability {
    pub fn enabled(&self) -> bool {
        self.missing.is_none()
    }

    pub fn disable(&mut self, ability: AbilityKind, capability: &'static str) {
        if self.missing.is_none() {
            error!(
                "{}",
                AbilityFault::MissingCapability {
                    ability,
                    capability
                }
            );
            self.missing = Some(capability);
        }
    }
}

/// Deadline for a one-shot phase: clip length plus margin, or the fallback.
pub(crate) fn one_shot_deadline(
    ctx: &AbilityContext,
    clip: &str,
    fallback: f32,
) -> f32 {
    let timeout = match ctx.animator.clip_duration(clip) {
        Some(length) if length > 0.0 => length + watchdog::COMPLETION_MARGIN,
        _ => fallback,
    };
    ctx.now + timeout
}
