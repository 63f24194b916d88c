//! Core domain: the shared character status tag and ability identities.

use bevy::prelude::*;

/// The five arbitrated abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityKind {
    Jump,
    Dash,
    Climb,
    PushPull,
    Attack,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 5] = [
        AbilityKind::Jump,
        AbilityKind::Dash,
        AbilityKind::Climb,
        AbilityKind::PushPull,
        AbilityKind::Attack,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AbilityKind::Jump => "jump",
            AbilityKind::Dash => "dash",
            AbilityKind::Climb => "climb",
            AbilityKind::PushPull => "push_pull",
            AbilityKind::Attack => "attack",
        }
    }
}

impl std::fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Status tag shared by every ability on a character.
///
/// Abilities change it only through [`CharacterStatus::set`] and
/// [`CharacterStatus::stop`]. `Dead` is sticky until [`CharacterStatus::revive`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterStatus {
    #[default]
    Idle,
    Run,
    Jump,
    Dash,
    Climb,
    Push,
    Attack,
    AttackComboWait,
    Damage,
    Dead,
}

impl CharacterStatus {
    /// Replace the tag. Returns false when the character is dead.
    pub fn set(&mut self, next: CharacterStatus) -> bool {
        if self.is_dead() && next != CharacterStatus::Dead {
            return false;
        }
        *self = next;
        true
    }

    /// Return to `Idle`, unless dead.
    pub fn stop(&mut self) {
        if !self.is_dead() {
            *self = CharacterStatus::Idle;
        }
    }

    pub fn revive(&mut self) {
        *self = CharacterStatus::Idle;
    }

    pub fn is_dead(self) -> bool {
        self == CharacterStatus::Dead
    }

    pub fn is_attacking(self) -> bool {
        matches!(
            self,
            CharacterStatus::Attack | CharacterStatus::AttackComboWait
        )
    }

    /// Statuses during which locomotion and new ability requests are frozen.
    pub fn blocks_actions(self) -> bool {
        matches!(
            self,
            CharacterStatus::Attack
                | CharacterStatus::AttackComboWait
                | CharacterStatus::Damage
                | CharacterStatus::Dead
        )
    }
}
