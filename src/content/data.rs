//! Data definitions for the RON tuning files.
//!
//! These structs mirror assets/data/*.ron. Every field has a default so a
//! partial file still loads.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::AbilityKind;

// ============================================================================
// Wrapper for list files (clips.ron)
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

// ============================================================================
// Action settings (action_settings.ron)
// ============================================================================

/// Easing shapes available to the dash displacement curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Reflect, Default)]
pub enum EaseType {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseOutCubic,
    EaseInOutSine,
}

/// Tunable movement and ability values, in world units (pixels) and seconds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct ActionSettings {
    pub move_speed: f32,
    /// Top-down style vertical locomotion.
    pub can_move_vertical: bool,
    /// Magnitude of world gravity; the physics world is kept in sync with it.
    pub world_gravity: f32,

    pub jump_height: f32,
    pub jump_time_to_apex: f32,
    /// Airborne time before a walk-off counts as a cliff fall.
    pub coyote_time: f32,
    /// Vertical speed below which a walk-off counts as a cliff fall.
    pub cliff_fall_speed: f32,

    pub dash_distance: f32,
    pub dash_duration: f32,
    pub dash_easing: EaseType,
    /// Optional sampled curve over [0, 1]; overrides `dash_easing` when present.
    pub dash_curve: Option<Vec<f32>>,

    /// Climb speed as a fraction of `move_speed`.
    pub climb_speed: f32,
    pub can_move_side_while_climbing: bool,

    /// Push and pull speeds as fractions of `move_speed`.
    pub push_speed: f32,
    pub pull_speed: f32,
    /// Space kept between the character and a gripped box face.
    pub grip_gap: f32,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            move_speed: 240.0,
            can_move_vertical: false,
            world_gravity: 980.0,
            jump_height: 110.0,
            jump_time_to_apex: 0.35,
            coyote_time: 0.08,
            cliff_fall_speed: -10.0,
            dash_distance: 160.0,
            dash_duration: 0.2,
            dash_easing: EaseType::EaseOutQuad,
            dash_curve: None,
            climb_speed: 0.6,
            can_move_side_while_climbing: false,
            push_speed: 0.5,
            pull_speed: 0.4,
            grip_gap: 1.0,
        }
    }
}

// ============================================================================
// Permission matrix (permissions.ron)
// ============================================================================

/// Which ability may interrupt which. Pairs without a field are never allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct PermissionMatrix {
    pub attack_while_dashing: bool,
    pub jump_while_dashing: bool,
    pub dash_while_jumping: bool,
    pub climb_while_jumping: bool,
    pub jump_while_climbing: bool,
    pub dash_while_climbing: bool,
    pub attack_while_jumping: bool,
    /// Horizontal input on the ground ends a dash early.
    pub move_while_dashing: bool,
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        Self {
            attack_while_dashing: false,
            jump_while_dashing: false,
            dash_while_jumping: true,
            climb_while_jumping: true,
            jump_while_climbing: false,
            dash_while_climbing: false,
            attack_while_jumping: false,
            move_while_dashing: false,
        }
    }
}

impl PermissionMatrix {
    /// May `request` interrupt `active`?
    pub fn allows(&self, request: AbilityKind, active: AbilityKind) -> bool {
        use AbilityKind::*;
        match (request, active) {
            (Attack, Dash) => self.attack_while_dashing,
            (Jump, Dash) => self.jump_while_dashing,
            (Dash, Jump) => self.dash_while_jumping,
            (Climb, Jump) => self.climb_while_jumping,
            (Jump, Climb) => self.jump_while_climbing,
            (Dash, Climb) => self.dash_while_climbing,
            (Attack, Jump) => self.attack_while_jumping,
            _ => false,
        }
    }
}

// ============================================================================
// Attack combo (attack_combo.ron)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct ComboStep {
    pub clip: String,
    /// Forward lunge while the strike plays, mirrored by facing.
    pub forward_distance: f32,
    /// Share of the strike clip spent lunging.
    pub forward_time_fraction: f32,
    /// How long the combo window stays open after the strike.
    pub wait_time: f32,
    pub affect_id: Option<u32>,
}

impl Default for ComboStep {
    fn default() -> Self {
        Self {
            clip: "attack1".to_string(),
            forward_distance: 0.0,
            forward_time_fraction: 0.5,
            wait_time: 0.3,
            affect_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[serde(default)]
pub struct ComboTable {
    pub steps: Vec<ComboStep>,
}

impl Default for ComboTable {
    fn default() -> Self {
        Self {
            steps: vec![
                ComboStep {
                    clip: "attack1".to_string(),
                    forward_distance: 8.0,
                    affect_id: Some(1),
                    ..default()
                },
                ComboStep {
                    clip: "attack2".to_string(),
                    forward_distance: 12.0,
                    affect_id: Some(2),
                    ..default()
                },
                ComboStep {
                    clip: "attack3".to_string(),
                    forward_distance: 20.0,
                    wait_time: 0.2,
                    affect_id: Some(3),
                    ..default()
                },
            ],
        }
    }
}

impl ComboTable {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&ComboStep> {
        self.steps.get(index)
    }
}

// ============================================================================
// Animation clips (clips.ron)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
pub struct ClipDef {
    pub name: String,
    pub frames: u32,
    pub frame_duration: f32,
    #[serde(default)]
    pub looping: bool,
}

impl ClipDef {
    pub fn new(name: &str, frames: u32, frame_duration: f32, looping: bool) -> Self {
        Self {
            name: name.to_string(),
            frames,
            frame_duration,
            looping,
        }
    }

    pub fn duration(&self) -> f32 {
        self.frames as f32 * self.frame_duration
    }
}

/// Clip set used when clips.ron is missing.
pub fn default_clips() -> Vec<ClipDef> {
    vec![
        ClipDef::new("idle", 4, 0.15, true),
        ClipDef::new("run", 6, 0.1, true),
        ClipDef::new("jump", 2, 0.08, false),
        ClipDef::new("jump_wait", 2, 0.1, true),
        ClipDef::new("jump_end", 2, 0.1, true),
        ClipDef::new("jump_land", 2, 0.06, false),
        ClipDef::new("dash", 2, 0.04, false),
        ClipDef::new("dash_play", 2, 0.05, true),
        ClipDef::new("dash_end", 2, 0.04, false),
        ClipDef::new("climb", 2, 0.08, false),
        ClipDef::new("climb_wait", 1, 0.2, true),
        ClipDef::new("climb_up", 4, 0.1, true),
        ClipDef::new("climb_down", 4, 0.1, true),
        ClipDef::new("climb_end", 2, 0.08, false),
        ClipDef::new("climb_end_top", 3, 0.08, false),
        ClipDef::new("push", 2, 0.08, false),
        ClipDef::new("push_wait", 1, 0.2, true),
        ClipDef::new("push_play", 4, 0.12, true),
        ClipDef::new("pull_play", 4, 0.12, true),
        ClipDef::new("push_end", 2, 0.08, false),
        ClipDef::new("attack1", 3, 0.08, false),
        ClipDef::new("attack2", 3, 0.08, false),
        ClipDef::new("attack3", 4, 0.08, false),
        ClipDef::new("attack_wait", 1, 0.2, true),
        ClipDef::new("attack_end", 2, 0.08, false),
    ]
}

// ============================================================================
// Aggregate snapshot handed to abilities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameContent {
    pub settings: ActionSettings,
    pub permissions: PermissionMatrix,
    pub combo: ComboTable,
    pub clips: Vec<ClipDef>,
}

impl GameContent {
    pub fn with_defaults() -> Self {
        Self {
            clips: default_clips(),
            ..default()
        }
    }
}
