//! Abilities domain: single-owner token over gravity scale and body mode.

use bevy::prelude::*;

use crate::core::AbilityKind;
use crate::movement::{BodyMode, CharacterBody};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Baseline {
    gravity_scale: f32,
    mode: BodyMode,
}

/// Tracks which ability currently overrides the body's physics.
///
/// The first claim records the baseline. A hand-off via [`release`] keeps
/// that baseline for the next owner, so chained overrides still restore the
/// values from before the first one. [`settle`] puts back a baseline nobody
/// owns any more.
///
/// [`release`]: PhysicsOverride::release
/// [`settle`]: PhysicsOverride::settle
#[derive(Debug, Clone, Default)]
pub struct PhysicsOverride {
    owner: Option<AbilityKind>,
    baseline: Option<Baseline>,
}

impl PhysicsOverride {
    pub fn owner(&self) -> Option<AbilityKind> {
        self.owner
    }

    pub fn is_owned_by(&self, ability: AbilityKind) -> bool {
        self.owner == Some(ability)
    }

    pub fn has_pending_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Take ownership. Fails while another ability holds the token.
    pub fn claim(&mut self, ability: AbilityKind, body: &dyn CharacterBody) -> bool {
        if let Some(owner) = self.owner {
            if owner != ability {
                warn!("{} cannot override physics held by {}", ability, owner);
                return false;
            }
        }
        if self.baseline.is_none() {
            self.baseline = Some(Baseline {
                gravity_scale: body.gravity_scale(),
                mode: body.mode(),
            });
        }
        self.owner = Some(ability);
        true
    }

    /// Restore the baseline. No-op unless `ability` owns the token.
    pub fn restore(&mut self, ability: AbilityKind, body: &mut dyn CharacterBody) -> bool {
        if !self.is_owned_by(ability) {
            return false;
        }
        self.owner = None;
        self.apply_baseline(body);
        true
    }

    /// Give up ownership without restoring; the baseline stays pending.
    pub fn release(&mut self, ability: AbilityKind) -> bool {
        if !self.is_owned_by(ability) {
            return false;
        }
        self.owner = None;
        true
    }

    /// Restore a pending baseline left without an owner.
    pub fn settle(&mut self, body: &mut dyn CharacterBody) -> bool {
        if self.owner.is_some() || self.baseline.is_none() {
            return false;
        }
        self.apply_baseline(body);
        true
    }

    fn apply_baseline(&mut self, body: &mut dyn CharacterBody) {
        if let Some(baseline) = self.baseline.take() {
            body.set_gravity_scale(baseline.gravity_scale);
            body.set_mode(baseline.mode);
        }
    }
}
